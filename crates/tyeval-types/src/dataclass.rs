//! §4.5: dataclass `__new__`/`__init__` synthesis.

use std::sync::Arc;

use tyeval_common::config::EvaluatorConfig;

use crate::class::ClassType;
use crate::function::{FunctionFlags, FunctionType, Param};
use crate::symbol::{DeclarationCategory, Symbol};
use crate::ty::Type;

/// One top-level simple-or-annotated assignment in a `@dataclass`'s class
/// suite, already filtered down from the full statement list by the
/// (out-of-scope) binder/scope builder — this module only ever sees
/// candidate fields, not arbitrary statements.
pub struct DataClassFieldDecl {
    pub name: String,
    pub r#type: Type,
    pub has_default: bool,
}

pub struct DataClassSynthesisError(pub String);

/// Validate field ordering and naming, then install `__new__`/`__init__`
/// on `class`.
///
/// Errors (§4.5):
/// - a field without a default following one that has a default;
/// - on `pythonVersion >= 3.7`, a field name starting with `_`.
pub fn synthesize_dataclass_methods(
    class: &Arc<ClassType>,
    fields: &[DataClassFieldDecl],
    config: &EvaluatorConfig,
) -> Result<(), DataClassSynthesisError> {
    let mut seen_default = false;
    for field in fields {
        if config.supports_underscore_field_rejection() && field.name.starts_with('_') {
            return Err(DataClassSynthesisError(format!(
                "Data field '{}' cannot start with an underscore",
                field.name
            )));
        }
        if seen_default && !field.has_default {
            return Err(DataClassSynthesisError(
                "Data fields without default value cannot appear after data fields with default values"
                    .to_string(),
            ));
        }
        if field.has_default {
            seen_default = true;
        }
    }

    let self_type = Type::object(class.clone());

    let mut new_params = vec![Param::simple("cls", Type::Class(class.clone()))];
    let mut init_params = vec![Param::simple("self", self_type.clone())];
    for field in fields {
        let mut param = Param::simple(field.name.clone(), field.r#type.clone());
        if field.has_default {
            param = param.with_default(field.r#type.clone());
        }
        new_params.push(param.clone());
        init_params.push(param);
        class.add_instance_field(
            field.name.clone(),
            Symbol::with_declared_type(DeclarationCategory::Variable, field.r#type.clone()),
        );
    }

    class.add_class_field(
        "__new__",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "__new__".to_string(),
                flags: FunctionFlags::STATIC_METHOD
                    | FunctionFlags::CONSTRUCTOR
                    | FunctionFlags::SYNTHESIZED,
                parameters: new_params,
                declared_return_type: Some(self_type.clone()),
                inferred_return_type: None,
                built_in_name: None,
            })),
        ),
    );
    class.add_class_field(
        "__init__",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "__init__".to_string(),
                flags: FunctionFlags::INSTANCE_METHOD | FunctionFlags::SYNTHESIZED,
                parameters: init_params,
                declared_return_type: Some(Type::None),
                inferred_return_type: None,
                built_in_name: None,
            })),
        ),
    );

    Ok(())
}
