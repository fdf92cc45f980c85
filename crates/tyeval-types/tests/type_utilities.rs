//! §8 universal invariants and §4.1 assignability rules for C1/C2, exercised
//! directly against the public `tyeval-types` surface (no evaluator needed).

use std::sync::Arc;

use tyeval_common::diagnostics::NullDiagnosticSink;
use tyeval_common::span::TextRange;
use tyeval_types::{
    can_assign_type, combine_types, do_for_subtypes, ClassFlags, ClassId, ClassType, Type,
    TypeVarMap, Variance,
};

fn range() -> TextRange {
    TextRange::default()
}

fn class(name: &str, id: u32) -> Arc<ClassType> {
    Arc::new(ClassType::new(name, ClassFlags::BUILT_IN, ClassId(id)))
}

#[test]
fn combine_types_of_empty_is_never() {
    assert!(matches!(combine_types(Vec::new()), Type::Never));
}

#[test]
fn combine_types_singleton_is_not_wrapped_in_a_union() {
    let int_obj = Type::object(class("int", 1));
    let combined = combine_types([int_obj.clone()]);
    assert!(matches!(combined, Type::Object { class_type, .. } if class_type.name == "int"));
}

#[test]
fn combine_types_flattens_nested_unions_and_dedups() {
    let int_obj = Type::object(class("int", 1));
    let str_obj = Type::object(class("str", 2));
    let inner = combine_types([int_obj.clone(), str_obj.clone()]);
    let outer = combine_types([inner, int_obj.clone(), str_obj.clone()]);
    let Type::Union(members) = outer else {
        panic!("expected a union, got {outer:?}");
    };
    // No nested union and no duplicate int/str members.
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| !m.is_union()));
}

#[test]
fn do_for_subtypes_identity_law_holds_for_unions_and_scalars() {
    let int_obj = Type::object(class("int", 1));
    let str_obj = Type::object(class("str", 2));
    let union = combine_types([int_obj.clone(), str_obj.clone()]);

    let result = do_for_subtypes(&union, Clone::clone);
    let Type::Union(members) = result else {
        panic!("expected a union back, got {result:?}");
    };
    assert_eq!(members.len(), 2);

    let scalar_result = do_for_subtypes(&int_obj, Clone::clone);
    assert!(matches!(scalar_result, Type::Object { class_type, .. } if class_type.name == "int"));
}

#[test]
fn can_assign_type_is_reflexive_except_for_never() {
    let int_obj = Type::object(class("int", 1));
    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&int_obj, &int_obj, range(), &mut sink, &mut var_map));

    // Never is assignable only from Never, not from itself acting as dst
    // with an unrelated src, but Never as dst accepts only Never.
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&Type::Never, &Type::Never, range(), &mut sink, &mut var_map));
    let mut var_map = TypeVarMap::new();
    assert!(!can_assign_type(&Type::Never, &int_obj, range(), &mut sink, &mut var_map));
}

#[test]
fn never_is_assignable_to_anything() {
    let int_obj = Type::object(class("int", 1));
    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&int_obj, &Type::Never, range(), &mut sink, &mut var_map));
}

#[test]
fn subclass_is_assignable_to_base_but_not_reverse() {
    let base = class("C", 10);
    let derived = class("D", 11);
    derived.add_base_class(base.clone(), true);

    let base_obj = Type::object(base);
    let derived_obj = Type::object(derived);

    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&base_obj, &derived_obj, range(), &mut sink, &mut var_map));

    let mut var_map = TypeVarMap::new();
    assert!(!can_assign_type(&derived_obj, &base_obj, range(), &mut sink, &mut var_map));
}

#[test]
fn base_class_not_marked_include_in_mro_does_not_satisfy_assignability() {
    let base = class("C", 20);
    let derived = class("D", 21);
    derived.add_base_class(base.clone(), false);

    let base_obj = Type::object(base);
    let derived_obj = Type::object(derived);

    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(!can_assign_type(&base_obj, &derived_obj, range(), &mut sink, &mut var_map));
}

#[test]
fn optional_union_accepts_none_and_the_wrapped_type() {
    let int_obj = Type::object(class("int", 1));
    let optional = combine_types([int_obj.clone(), Type::None]);

    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&optional, &int_obj, range(), &mut sink, &mut var_map));
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&optional, &Type::None, range(), &mut sink, &mut var_map));
}

#[test]
fn typevar_binds_on_first_assignment_and_is_checked_on_reuse() {
    let var: Arc<tyeval_types::TypeVarDetails> = Arc::new(tyeval_types::TypeVarDetails {
        id: 1,
        name: "T".to_string(),
        bound: None,
        constraints: Vec::new(),
        variance: Variance::Invariant,
    });
    let dst = Type::TypeVar(var.clone());
    let int_obj = Type::object(class("int", 1));
    let str_obj = Type::object(class("str", 2));

    let mut sink = NullDiagnosticSink;
    let mut var_map = TypeVarMap::new();
    assert!(can_assign_type(&dst, &int_obj, range(), &mut sink, &mut var_map));
    assert!(matches!(var_map.get(&var), Some(Type::Object { class_type, .. }) if class_type.name == "int"));

    // Same type variable, incompatible second binding, must fail.
    assert!(!can_assign_type(&dst, &str_obj, range(), &mut sink, &mut var_map));
}
