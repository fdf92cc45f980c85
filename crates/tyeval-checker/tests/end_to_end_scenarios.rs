//! §8 "End-to-end scenarios" — exercised through `Evaluator::get_type`
//! against a minimal in-memory `Scope`, the same fake shape the `Scope`
//! trait's own doc comment anticipates tests using.

use std::collections::HashMap;
use std::sync::Arc;

use tyeval_ast::{Arena, Argument, ArgumentCategory, ConstantKind, ExprKind};
use tyeval_checker::{Evaluator, GetTypeFlags, HashMapTypeCache, TypeUsage};
use tyeval_common::config::EvaluatorConfig;
use tyeval_common::diagnostics::VecDiagnosticSink;
use tyeval_common::span::TextRange;
use tyeval_scope::{Constraint, Scope, ScopeKind, SymbolLookup};
use tyeval_types::{
    combine_types, ClassFlags, ClassId, ClassType, DeclarationCategory, FunctionFlags,
    FunctionType, Param, ParamCategory, Symbol, Type,
};

struct FakeScope {
    symbols: HashMap<String, Symbol>,
}

impl FakeScope {
    fn new() -> Self {
        FakeScope {
            symbols: HashMap::new(),
        }
    }

    fn with(mut self, name: &str, symbol: Symbol) -> Self {
        self.symbols.insert(name.to_string(), symbol);
        self
    }
}

impl Scope for FakeScope {
    fn look_up_symbol_recursive(&self, name: &str) -> Option<SymbolLookup<'_>> {
        self.symbols.get(name).map(|symbol| SymbolLookup {
            symbol: symbol.clone(),
            owning_scope: self as &dyn Scope,
        })
    }

    fn parent(&self) -> Option<&dyn Scope> {
        None
    }

    fn scope_kind(&self) -> ScopeKind {
        ScopeKind::Permanent
    }

    fn type_constraints(&self) -> &[Arc<dyn Constraint>] {
        &[]
    }
}

fn range() -> TextRange {
    TextRange { start: 0, end: 0 }
}

fn builtin_class(name: &str, id: u32) -> Arc<ClassType> {
    Arc::new(ClassType::new(name, ClassFlags::BUILT_IN, ClassId(id)))
}

fn base_scope() -> FakeScope {
    FakeScope::new()
        .with("int", Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("int", 1))))
        .with("str", Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("str", 2))))
        .with("bool", Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("bool", 3))))
}

fn simple_arg(value: tyeval_ast::NodeId, name: Option<&str>) -> Argument {
    Argument {
        value: Some(value),
        category: ArgumentCategory::Simple,
        name: name.map(str::to_string),
    }
}

/// §8 scenario 1: `x: int = "hello"` — assignment validation reports a
/// mismatch naming both the source and destination types.
#[test]
fn scenario_1_assigning_a_str_literal_to_an_int_annotated_target_is_a_mismatch() {
    let mut arena = Arena::new();
    let int_name = arena.push(ExprKind::Name { name: "int".to_string() }, range(), None);
    let rhs = arena.push(
        ExprKind::Constant(ConstantKind::Str {
            type_comment: None,
            value: Some("hello".to_string()),
        }),
        range(),
        None,
    );

    let scope = base_scope();
    let config = EvaluatorConfig::default();
    let mut cache = HashMapTypeCache::default();
    let mut sink = VecDiagnosticSink::default();
    let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

    let dst = evaluator.get_type(int_name, TypeUsage::Read, GetTypeFlags::EXPECTING_TYPE);
    let src = evaluator.get_type(rhs, TypeUsage::Read, GetTypeFlags::empty());

    let mut var_map = tyeval_types::TypeVarMap::new();
    let ok = tyeval_types::can_assign_type(&dst, &src, range(), &mut sink, &mut var_map);
    assert!(!ok);
    assert!(sink.0.iter().any(|d| d.message.contains("cannot be assigned to parameter")));
}

/// §8 scenario 2: `def f(a, b=1, *c, d, **e): ...; f(1, 2, 3, 4, d=5, e=6)`
/// — no diagnostic, and the call's result is the function's declared return.
#[test]
fn scenario_2_full_pep3102_call_matches_with_no_diagnostics() {
    let int_class = builtin_class("int", 1);
    let int_ty = Type::object(int_class.clone());

    let function = Arc::new(FunctionType {
        name: "f".to_string(),
        flags: FunctionFlags::empty(),
        parameters: vec![
            Param::simple("a", Type::Unknown),
            Param {
                category: ParamCategory::Simple,
                name: Some("b".to_string()),
                has_default: true,
                default_type: Some(int_ty.clone()),
                r#type: Type::Unknown,
            },
            Param::var_arg_list("c", Type::Unknown),
            Param::simple("d", Type::Unknown),
            Param::var_arg_dict("e", Type::Unknown),
        ],
        declared_return_type: Some(int_ty.clone()),
        inferred_return_type: None,
        built_in_name: None,
    });

    let mut arena = Arena::new();
    let callee = arena.push(ExprKind::Name { name: "f".to_string() }, range(), None);
    let one = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
    let two = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
    let three = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
    let four = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
    let five = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
    let six = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);

    let args = vec![
        simple_arg(one, None),
        simple_arg(two, None),
        simple_arg(three, None),
        simple_arg(four, None),
        simple_arg(five, Some("d")),
        simple_arg(six, Some("e")),
    ];
    let call = arena.push(ExprKind::Call { callee, args }, range(), None);

    let scope = base_scope().with("f", Symbol::new(DeclarationCategory::Function, Type::Function(function)));
    let config = EvaluatorConfig::default();
    let mut cache = HashMapTypeCache::default();
    let mut sink = VecDiagnosticSink::default();
    let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

    let ty = evaluator.get_type(call, TypeUsage::Read, GetTypeFlags::empty());
    assert!(sink.0.is_empty(), "unexpected diagnostics: {:?}", sink.0);
    assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "int"));
}

/// §8 scenario 3: `def g(a): ...; g()` — "Argument missing for parameter 'a'".
#[test]
fn scenario_3_missing_required_argument_is_reported() {
    let function = Arc::new(FunctionType {
        name: "g".to_string(),
        flags: FunctionFlags::empty(),
        parameters: vec![Param::simple("a", Type::Unknown)],
        declared_return_type: Some(Type::None),
        inferred_return_type: None,
        built_in_name: None,
    });

    let mut arena = Arena::new();
    let callee = arena.push(ExprKind::Name { name: "g".to_string() }, range(), None);
    let call = arena.push(ExprKind::Call { callee, args: Vec::new() }, range(), None);

    let scope = base_scope().with("g", Symbol::new(DeclarationCategory::Function, Type::Function(function)));
    let config = EvaluatorConfig::default();
    let mut cache = HashMapTypeCache::default();
    let mut sink = VecDiagnosticSink::default();
    let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

    let ty = evaluator.get_type(call, TypeUsage::Read, GetTypeFlags::empty());
    assert!(ty.is_unknown());
    assert!(sink.0.iter().any(|d| d.message.contains("Argument missing for parameter 'a'")));
}

/// §8 scenario 4: `class C: pass; class D(C): pass; x: C = D()` — accepted.
#[test]
fn scenario_4_subclass_instance_assignable_to_base_class_annotation() {
    let base = builtin_class("C", 10);
    let derived = builtin_class("D", 11);
    derived.add_base_class(base.clone(), true);

    let base_obj = Type::object(base);
    let derived_obj = Type::object(derived);

    let mut sink = VecDiagnosticSink::default();
    let mut var_map = tyeval_types::TypeVarMap::new();
    assert!(tyeval_types::can_assign_type(&base_obj, &derived_obj, range(), &mut sink, &mut var_map));
    assert!(sink.0.is_empty());
}

/// §8 scenario 5: `x: Optional[int] = None; x.bit_length()` — configurable
/// diagnostic once, result type the member's return (`int`, modeled here as
/// a zero-arg bound method returning `int`).
#[test]
fn scenario_5_member_access_through_optional_reports_once_and_returns_member_type() {
    let int_class = builtin_class("int", 1);
    let bit_length = Arc::new(FunctionType {
        name: "bit_length".to_string(),
        flags: FunctionFlags::INSTANCE_METHOD,
        parameters: vec![Param::simple("self", Type::object(int_class.clone()))],
        declared_return_type: Some(Type::object(int_class.clone())),
        inferred_return_type: None,
        built_in_name: None,
    });
    int_class.add_class_field(
        "bit_length",
        Symbol::new(DeclarationCategory::Method, Type::Function(bit_length)),
    );

    let optional_int = combine_types([Type::object(int_class), Type::None]);

    let mut arena = Arena::new();
    let base = arena.push(ExprKind::Name { name: "x".to_string() }, range(), None);
    let access = arena.push(
        ExprKind::MemberAccess {
            base,
            member: "bit_length".to_string(),
        },
        range(),
        None,
    );

    let scope = base_scope().with("x", Symbol::new(DeclarationCategory::Variable, optional_int));
    let config = EvaluatorConfig::default();
    let mut cache = HashMapTypeCache::default();
    let mut sink = VecDiagnosticSink::default();
    let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

    let ty = evaluator.get_type(access, TypeUsage::Read, GetTypeFlags::empty());
    assert_eq!(sink.0.len(), 1, "the optional-member diagnostic should fire exactly once");
    assert!(sink.0[0].message.contains("bit_length"));
    // `bit_length` is an instance method bound to an `int` -- its declared
    // return is `int` itself, unrelated to the call (no call happens here,
    // only the member access), so the resulting type is the bound method.
    assert!(matches!(ty, Type::Function(f) if f.name == "bit_length"));
}
