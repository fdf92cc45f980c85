//! §4.5: `NamedTuple(name, fields)` class synthesis.

use std::sync::Arc;

use crate::class::{ClassFlags, ClassId, ClassType};
use crate::function::{FunctionFlags, FunctionType, Param};
use crate::symbol::{DeclarationCategory, Symbol};
use crate::ty::Type;

/// The two literal forms `NamedTuple`'s `fields` argument accepts, plus a
/// fallback for when the field list could not be statically determined
/// (e.g. built from a variable rather than a literal) — in that mode the
/// class gets a synthesized `__getattribute__` returning `Unknown` instead
/// of per-field declarations, per §4.5's "dynamic-fields fallback mode".
pub enum NamedTupleFields {
    /// Whitespace-separated name list (untyped mode); each field's type is
    /// `Unknown`.
    Untyped(String),
    /// `(name, type)` pairs (typed mode); `name` is `None` when omitted,
    /// and falls back to `_<index>`.
    Typed(Vec<(Option<String>, Type)>),
    Dynamic,
}

pub struct NamedTupleError(pub String);

/// Resolved field list after validating names (duplicate/empty checks and
/// the `_<index>` fallback both happen here, before any class is built).
fn resolve_field_names(fields: &NamedTupleFields) -> Result<Vec<(String, Type)>, NamedTupleError> {
    let raw: Vec<(Option<String>, Type)> = match fields {
        NamedTupleFields::Untyped(s) => s
            .split_whitespace()
            .map(|name| (Some(name.to_string()), Type::Unknown))
            .collect(),
        NamedTupleFields::Typed(pairs) => pairs.clone(),
        NamedTupleFields::Dynamic => return Ok(Vec::new()),
    };

    let mut resolved = Vec::with_capacity(raw.len());
    for (index, (name, ty)) in raw.into_iter().enumerate() {
        let name = match name {
            Some(n) if n.is_empty() => {
                return Err(NamedTupleError("Field name cannot be empty".to_string()))
            }
            Some(n) => n,
            None => format!("_{index}"),
        };
        if resolved.iter().any(|(existing, _): &(String, Type)| existing == &name) {
            return Err(NamedTupleError(format!("Duplicate field name '{name}'")));
        }
        resolved.push((name, ty));
    }
    Ok(resolved)
}

/// Build the synthesized class for `NamedTuple(name, fields)`.
///
/// `object_class`/`str_class`/`int_class`/`list_class`/`tuple_class` are
/// resolved by the caller via `Scope::get_builtin_type` — this module has
/// no scope dependency of its own.
pub fn synthesize_named_tuple(
    name: &str,
    fields: &NamedTupleFields,
    source_id: ClassId,
    object_class: Arc<ClassType>,
    str_class: Arc<ClassType>,
    int_class: Arc<ClassType>,
    list_class: Arc<ClassType>,
    tuple_class: Arc<ClassType>,
) -> Result<Arc<ClassType>, NamedTupleError> {
    let resolved_fields = resolve_field_names(fields)?;

    let class = Arc::new(ClassType::new(name, ClassFlags::NAMED_TUPLE, source_id));
    class.add_base_class(object_class, true);

    let self_type = Type::object(class.clone());

    let mut new_params = vec![Param::simple("cls", Type::Class(class.clone()))];
    let mut init_params = vec![Param::simple("self", self_type.clone())];
    for (field_name, field_type) in &resolved_fields {
        new_params.push(Param::simple(field_name.clone(), field_type.clone()));
        init_params.push(Param::simple(field_name.clone(), field_type.clone()));
        class.add_instance_field(
            field_name.clone(),
            Symbol::with_declared_type(DeclarationCategory::Variable, field_type.clone()),
        );
    }

    class.add_class_field(
        "__new__",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "__new__".to_string(),
                flags: FunctionFlags::STATIC_METHOD | FunctionFlags::SYNTHESIZED,
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

    let str_list = Type::Class(list_class.clone_for_specialization(vec![Type::object(str_class.clone())]));
    class.add_class_field(
        "keys",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "keys".to_string(),
                flags: FunctionFlags::INSTANCE_METHOD | FunctionFlags::SYNTHESIZED,
                parameters: vec![Param::simple("self", self_type.clone())],
                declared_return_type: Some(str_list),
                inferred_return_type: None,
                built_in_name: None,
            })),
        ),
    );

    let item_tuple = Type::Class(tuple_class.clone_for_specialization(vec![
        Type::object(str_class.clone()),
        Type::Any { is_ellipsis: false },
    ]));
    let items_list = Type::Class(list_class.clone_for_specialization(vec![item_tuple]));
    class.add_class_field(
        "items",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "items".to_string(),
                flags: FunctionFlags::INSTANCE_METHOD | FunctionFlags::SYNTHESIZED,
                parameters: vec![Param::simple("self", self_type.clone())],
                declared_return_type: Some(items_list),
                inferred_return_type: None,
                built_in_name: None,
            })),
        ),
    );

    class.add_class_field(
        "__len__",
        Symbol::new(
            DeclarationCategory::Method,
            Type::Function(Arc::new(FunctionType {
                name: "__len__".to_string(),
                flags: FunctionFlags::INSTANCE_METHOD | FunctionFlags::SYNTHESIZED,
                parameters: vec![Param::simple("self", self_type.clone())],
                declared_return_type: Some(Type::object(int_class)),
                inferred_return_type: None,
                built_in_name: None,
            })),
        ),
    );

    if matches!(fields, NamedTupleFields::Dynamic) {
        class.add_class_field(
            "__getattribute__",
            Symbol::new(
                DeclarationCategory::Method,
                Type::Function(Arc::new(FunctionType {
                    name: "__getattribute__".to_string(),
                    flags: FunctionFlags::INSTANCE_METHOD | FunctionFlags::SYNTHESIZED,
                    parameters: vec![
                        Param::simple("self", self_type),
                        Param::simple("name", Type::Unknown),
                    ],
                    declared_return_type: Some(Type::Unknown),
                    inferred_return_type: None,
                    built_in_name: None,
                })),
            ),
        );
    }

    Ok(class)
}
