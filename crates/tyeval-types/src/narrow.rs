//! §4.1 / §4.4: `removeTruthinessFromType` / `removeFalsinessFromType`,
//! used by the boolean `and`/`or` dispatch and by ternary narrowing.

use crate::combine::do_for_subtypes;
use crate::ty::Type;

/// Narrow `t` to the subset of its subtypes that can be truthy, tagging
/// `Object` subtypes whose truthiness is still ambiguous as unresolved
/// (`truthy: None`) and dropping `None`/falsy-pinned `Object` branches
/// entirely, since they can never satisfy a truthy test.
#[must_use]
pub fn remove_falsiness_from_type(t: &Type) -> Type {
    do_for_subtypes(t, |sub| match sub {
        Type::None => Type::Never,
        Type::Object {
            class_type,
            truthy: Some(false),
        } => {
            let _ = class_type;
            Type::Never
        }
        other => other.clone(),
    })
}

/// Narrow `t` to the subset of its subtypes that can be falsy.
#[must_use]
pub fn remove_truthiness_from_type(t: &Type) -> Type {
    do_for_subtypes(t, |sub| match sub {
        Type::Object {
            class_type,
            truthy: Some(true),
        } => {
            let _ = class_type;
            Type::Never
        }
        other => other.clone(),
    })
}
