//! §4.5 / §8 scenario 6: dataclass field-ordering and naming validation.

use std::sync::Arc;

use tyeval_common::config::EvaluatorConfig;
use tyeval_types::{
    synthesize_dataclass_methods, ClassFlags, ClassId, ClassType, DataClassFieldDecl, Type,
};

fn class() -> Arc<ClassType> {
    Arc::new(ClassType::new("P", ClassFlags::DATA_CLASS, ClassId(1)))
}

fn int_field(name: &str, has_default: bool) -> DataClassFieldDecl {
    let int_class = Arc::new(ClassType::new("int", ClassFlags::BUILT_IN, ClassId(99)));
    DataClassFieldDecl {
        name: name.to_string(),
        r#type: Type::object(int_class),
        has_default,
    }
}

#[test]
fn field_without_default_after_defaulted_field_is_rejected() {
    // `@dataclass class P: x: int; y: int = 0; z: int` (§8 scenario 6).
    let fields = vec![
        int_field("x", false),
        int_field("y", true),
        int_field("z", false),
    ];
    let err = synthesize_dataclass_methods(&class(), &fields, &EvaluatorConfig::default())
        .expect_err("z should be rejected");
    assert!(err.0.contains("cannot appear after"));
}

#[test]
fn all_required_then_all_defaulted_fields_synthesize_cleanly() {
    let fields = vec![int_field("x", false), int_field("y", true)];
    let class = class();
    synthesize_dataclass_methods(&class, &fields, &EvaluatorConfig::default())
        .expect("ordering is valid, synthesis should succeed");

    assert!(class.class_fields().contains_key("__new__"));
    assert!(class.class_fields().contains_key("__init__"));
    assert!(class.instance_fields().contains_key("x"));
    assert!(class.instance_fields().contains_key("y"));

    let Type::Function(new_fn) = class.class_fields().get("__new__").unwrap().effective_type() else {
        panic!("expected __new__ to be a Function");
    };
    // cls, x, y
    assert_eq!(new_fn.parameters.len(), 3);
}

#[test]
fn underscore_prefixed_field_rejected_on_python_3_7_and_above() {
    let fields = vec![int_field("_private", false)];
    let mut config = EvaluatorConfig::default();
    config.python_version = (3, 7);
    let err = synthesize_dataclass_methods(&class(), &fields, &config)
        .expect_err("leading underscore should be rejected on 3.7+");
    assert!(err.0.contains("_private"));
}

#[test]
fn underscore_prefixed_field_allowed_before_python_3_7() {
    let fields = vec![int_field("_private", false)];
    let mut config = EvaluatorConfig::default();
    config.python_version = (3, 6);
    synthesize_dataclass_methods(&class(), &fields, &config)
        .expect("pre-3.7 targets do not reject underscore-prefixed fields");
}
