//! The expression type evaluator: member resolution (C3), call matching
//! (C4), the expression dispatcher (C5), generic/special-form synthesis
//! wiring (C6), narrowing glue (C7), and the cache/diagnostic gateway (C8).
//!
//! `dispatch::Evaluator` is the crate's one public entry point (§2, §6):
//! construct one per scope under analysis, inject its collaborators, and
//! call [`dispatch::Evaluator::get_type`] (or one of the other "Exposed
//! surface" methods) per expression node.

pub mod cache;
pub mod call_matcher;
pub mod dispatch;
pub mod flags;
pub mod member_access;
pub mod narrowing;
pub mod special_forms_dispatch;

pub use cache::{with_silenced_diagnostics, HashMapTypeCache, NullTypeCache, TypeCache};
pub use dispatch::Evaluator;
pub use flags::{GetTypeFlags, TypeUsage};
pub use member_access::MemberUsage;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tyeval_ast::{Arena, ArgumentCategory, ConstantKind, ExprKind, KeywordType};
    use tyeval_common::config::EvaluatorConfig;
    use tyeval_common::diagnostics::VecDiagnosticSink;
    use tyeval_common::span::TextRange;
    use tyeval_scope::{Scope, ScopeKind, SymbolLookup};
    use tyeval_types::{ClassFlags, ClassId, ClassType, DeclarationCategory, Symbol, Type};

    use super::*;

    fn range() -> TextRange {
        TextRange { start: 0, end: 0 }
    }

    /// A flat, single-scope `Scope` fake backed by an in-memory map — the
    /// "tests implement this directly over a small in-memory map" fake the
    /// `Scope` trait's own doc comment anticipates.
    struct FakeScope {
        symbols: std::collections::HashMap<String, Symbol>,
    }

    impl FakeScope {
        fn new() -> Self {
            FakeScope {
                symbols: std::collections::HashMap::new(),
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

        fn type_constraints(&self) -> &[Arc<dyn tyeval_scope::Constraint>] {
            &[]
        }
    }

    fn builtin_class(name: &str, id: u32) -> Arc<ClassType> {
        Arc::new(ClassType::new(name, ClassFlags::BUILT_IN, ClassId(id)))
    }

    fn base_scope() -> FakeScope {
        FakeScope::new()
            .with(
                "int",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("int", 1))),
            )
            .with(
                "str",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("str", 2))),
            )
            .with(
                "bool",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("bool", 3))),
            )
            .with(
                "float",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("float", 4))),
            )
            .with(
                "list",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("list", 5))),
            )
            .with(
                "set",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("set", 6))),
            )
            .with(
                "dict",
                Symbol::new(DeclarationCategory::Class, Type::Class(builtin_class("dict", 7))),
            )
    }

    #[test]
    fn name_resolves_through_scope() {
        let mut arena = Arena::new();
        let node = arena.push(ExprKind::Name { name: "int".to_string() }, range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(node, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Class(c) if c.name == "int"));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn undefined_name_reports_and_returns_unknown() {
        let mut arena = Arena::new();
        let node = arena.push(ExprKind::Name { name: "nope".to_string() }, range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(node, TypeUsage::Read, GetTypeFlags::empty());
        assert!(ty.is_unknown());
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn cache_is_consulted_before_dispatch() {
        let mut arena = Arena::new();
        let node = arena.push(ExprKind::Name { name: "nope".to_string() }, range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        cache.set(node, Type::object(builtin_class("int", 1)));
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(node, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "int"));
        assert!(sink.0.is_empty(), "a cache hit must not re-dispatch and re-report");
    }

    #[test]
    fn list_literal_specializes_by_combined_element_type() {
        let mut arena = Arena::new();
        let one = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let two = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let list = arena.push(ExprKind::List(vec![one, two]), range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(list, TypeUsage::Read, GetTypeFlags::empty());
        let Type::Object { class_type, .. } = ty else {
            panic!("expected a list object, got {ty:?}");
        };
        assert_eq!(class_type.name, "list");
        assert_eq!(class_type.type_args.len(), 1);
        assert!(matches!(&class_type.type_args[0], Type::Object { class_type, .. } if class_type.name == "int"));
    }

    #[test]
    fn dict_literal_is_always_unknown_unknown() {
        let mut arena = Arena::new();
        let key = arena.push(
            ExprKind::Constant(ConstantKind::Str {
                type_comment: None,
                value: Some("k".to_string()),
            }),
            range(),
            None,
        );
        let value = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let dict = arena.push(ExprKind::Dict(vec![(key, value)]), range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(dict, TypeUsage::Read, GetTypeFlags::empty());
        let Type::Object { class_type, .. } = ty else {
            panic!("expected a dict object, got {ty:?}");
        };
        assert_eq!(class_type.name, "dict");
        assert_eq!(class_type.type_args.len(), 2);
        assert!(class_type.type_args.iter().all(Type::is_unknown));
    }

    #[test]
    fn numeric_promotion_widens_int_and_float_to_float() {
        let mut arena = Arena::new();
        let left = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let right = arena.push(
            ExprKind::Name {
                name: "pi".to_string(),
            },
            range(),
            None,
        );
        let add = arena.push(
            ExprKind::BinaryOp {
                op: tyeval_ast::OperatorType::Add,
                left,
                right,
            },
            range(),
            None,
        );

        let scope = base_scope().with(
            "pi",
            Symbol::new(DeclarationCategory::Variable, Type::object(builtin_class("float", 4))),
        );
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(add, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "float"));
    }

    #[test]
    fn slice_expression_is_specialized_as_set_not_slice() {
        // §9: the documented bug — preserved, not fixed.
        let mut arena = Arena::new();
        let slice = arena.push(
            ExprKind::Slice {
                lower: None,
                upper: None,
                step: None,
            },
            range(),
            None,
        );

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(slice, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "set"));
    }

    #[test]
    fn comprehension_expression_is_always_unknown() {
        // §9: the documented bug — preserved, not fixed.
        let mut arena = Arena::new();
        let one = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let iterable = arena.push(ExprKind::List(vec![one]), range(), None);
        let element = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let comp = arena.push(
            ExprKind::Comprehension {
                kind: tyeval_ast::ComprehensionKind::List,
                element,
                iterable,
            },
            range(),
            None,
        );

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(comp, TypeUsage::Read, GetTypeFlags::empty());
        assert!(ty.is_unknown());
    }

    #[test]
    fn unary_invert_uses_the_misspelled_dunder() {
        // §9: the documented bug — preserved, not fixed.
        let class = Arc::new(ClassType::new("Vec", ClassFlags::empty(), ClassId(100)));
        let self_type = Type::object(class.clone());
        class.add_class_field(
            "__inv__",
            Symbol::new(
                DeclarationCategory::Method,
                Type::Function(Arc::new(tyeval_types::FunctionType {
                    name: "__inv__".to_string(),
                    flags: tyeval_types::FunctionFlags::INSTANCE_METHOD,
                    parameters: vec![tyeval_types::Param::simple("self", self_type.clone())],
                    declared_return_type: Some(self_type.clone()),
                    inferred_return_type: None,
                    built_in_name: None,
                })),
            ),
        );

        let mut arena = Arena::new();
        let operand = arena.push(ExprKind::Name { name: "v".to_string() }, range(), None);
        let unary = arena.push(
            ExprKind::UnaryOp {
                op: tyeval_ast::OperatorType::Invert,
                operand,
            },
            range(),
            None,
        );

        let scope = base_scope().with("v", Symbol::new(DeclarationCategory::Variable, self_type));
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(unary, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "Vec"));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn member_access_through_optional_union_reports_configured_level() {
        let class = builtin_class("Widget", 200);
        class.add_instance_field(
            "label",
            Symbol::new(DeclarationCategory::Variable, Type::object(builtin_class("str", 2))),
        );

        let mut arena = Arena::new();
        let base = arena.push(ExprKind::Name { name: "w".to_string() }, range(), None);
        let access = arena.push(
            ExprKind::MemberAccess {
                base,
                member: "label".to_string(),
            },
            range(),
            None,
        );

        let union = Type::Union(Arc::new(vec![Type::object(class), Type::None]));
        let scope = base_scope().with("w", Symbol::new(DeclarationCategory::Variable, union));
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(access, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "str"));
        assert_eq!(sink.0.len(), 1);
    }

    #[test]
    fn type_annotation_of_a_bare_class_yields_its_instance_type() {
        let mut arena = Arena::new();
        let name = arena.push(ExprKind::Name { name: "int".to_string() }, range(), None);

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(name, TypeUsage::Read, GetTypeFlags::EXPECTING_TYPE);
        assert!(matches!(ty, Type::Object { class_type, .. } if class_type.name == "int"));
    }

    #[test]
    fn lambda_without_prior_annotation_infers_from_its_body() {
        let mut arena = Arena::new();
        let body = arena.push(ExprKind::Constant(ConstantKind::Number), range(), None);
        let lambda = arena.push(
            ExprKind::Lambda {
                params: vec![tyeval_ast::LambdaParam {
                    name: "x".to_string(),
                    category: ArgumentCategory::Simple,
                    default: None,
                }],
                body,
            },
            range(),
            None,
        );

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(lambda, TypeUsage::Read, GetTypeFlags::empty());
        let Type::Function(f) = ty else {
            panic!("expected a Function, got {ty:?}");
        };
        assert_eq!(f.parameters.len(), 1);
        assert!(matches!(f.effective_return_type(), Type::Object { class_type, .. } if class_type.name == "int"));
    }

    #[test]
    fn keyword_constants_map_to_truthy_tagged_bool() {
        let mut arena = Arena::new();
        let t = arena.push(
            ExprKind::Constant(ConstantKind::Keyword(KeywordType::True)),
            range(),
            None,
        );

        let scope = base_scope();
        let config = EvaluatorConfig::default();
        let mut cache = HashMapTypeCache::default();
        let mut sink = VecDiagnosticSink::default();
        let mut evaluator = Evaluator::new(&arena, &scope, &config, &mut cache, &mut sink);

        let ty = evaluator.get_type(t, TypeUsage::Read, GetTypeFlags::empty());
        assert!(matches!(ty, Type::Object { truthy: Some(true), .. }));
    }
}
