//! §4.1: `bindFunctionToClassOrObject` and `lookUpClassMember`.

use std::sync::Arc;

use crate::class::ClassType;
use crate::function::{FunctionFlags, FunctionType, Param};
use crate::symbol::Symbol;
use crate::ty::Type;

/// Remove the leading `self`/`cls` parameter when binding a method to the
/// instance or class it was looked up on.
///
/// - `base` an `Object(C)` and `fn` an instance method → drop the first
///   parameter (binds `self`).
/// - `base` a `Class(C)` and `fn` a class method → drop the first parameter
///   (binds `cls`).
/// - Static methods, and any other `base`/`fn` combination, are returned
///   unchanged.
#[must_use]
pub fn bind_function_to_class_or_object(base: &Type, f: &Arc<FunctionType>) -> Arc<FunctionType> {
    let should_strip = match base {
        Type::Object { .. } => f.is_instance_method(),
        Type::Class(_) => f.is_class_method(),
        _ => false,
    };

    if !should_strip || f.parameters.is_empty() {
        return f.clone();
    }

    let mut bound = (**f).clone();
    bound.parameters = f.parameters[1..].to_vec();
    Arc::new(bound)
}

/// Result of `lookUpClassMember`: the symbol found plus the class that
/// actually declares it (which may be a transitive base of the class the
/// search started from).
pub struct MemberLookupResult {
    pub symbol: Symbol,
    pub declaring_class: Arc<ClassType>,
}

/// §4.1 `lookUpClassMember`: depth-first MRO walk over base classes marked
/// `include_in_mro`, checking the class's own field maps before descending
/// into bases. Alias classes (`List` → `list`) are followed before any
/// lookup begins, per §4.1.
#[must_use]
pub fn look_up_class_member(
    cls: &Arc<ClassType>,
    name: &str,
    include_instance: bool,
    include_bases: bool,
) -> Option<MemberLookupResult> {
    look_up_class_member_with_flags(cls, name, include_instance, include_bases, false)
}

/// As [`look_up_class_member`], with the ability to also honor
/// `SKIP_OBJECT_BASE_CLASS` (§4.3: `__new__` lookup for constructor
/// dispatch skips the universal `object` base so a user class with no
/// `__new__` of its own doesn't spuriously resolve to `object.__new__`'s
/// trivial signature).
#[must_use]
pub fn look_up_class_member_with_flags(
    cls: &Arc<ClassType>,
    name: &str,
    include_instance: bool,
    include_bases: bool,
    skip_object_base_class: bool,
) -> Option<MemberLookupResult> {
    let resolved = cls.resolve_alias();
    look_up_class_member_inner(&resolved, name, include_instance, include_bases, skip_object_base_class)
}

fn look_up_class_member_inner(
    cls: &Arc<ClassType>,
    name: &str,
    include_instance: bool,
    include_bases: bool,
    skip_object_base_class: bool,
) -> Option<MemberLookupResult> {
    if skip_object_base_class && cls.name == "object" && cls.is_built_in() {
        return None;
    }
    if let Some(symbol) = cls.class_fields().get(name) {
        return Some(MemberLookupResult {
            symbol: symbol.clone(),
            declaring_class: cls.clone(),
        });
    }
    if include_instance {
        if let Some(symbol) = cls.instance_fields().get(name) {
            return Some(MemberLookupResult {
                symbol: symbol.clone(),
                declaring_class: cls.clone(),
            });
        }
    }
    if include_bases {
        for (base, include_in_mro) in cls.base_classes().iter() {
            if *include_in_mro {
                if let Some(found) = look_up_class_member_inner(
                    base,
                    name,
                    include_instance,
                    include_bases,
                    skip_object_base_class,
                ) {
                    return Some(found);
                }
            }
        }
    }
    None
}

bitflags::bitflags! {
    /// Member-access control flags (§4.2).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MemberAccessFlags: u8 {
        const SKIP_INSTANCE_MEMBERS    = 1 << 0;
        const SKIP_GET_ATTRIBUTE_CHECK = 1 << 1;
        const SKIP_GET_CHECK           = 1 << 2;
        const SKIP_OBJECT_BASE_CLASS   = 1 << 3;
    }
}

impl MemberAccessFlags {
    /// §4.2: "used internally to find raw method definitions without
    /// invoking descriptors or attribute fallbacks".
    #[must_use]
    pub fn for_method_lookup() -> Self {
        MemberAccessFlags::SKIP_INSTANCE_MEMBERS
            | MemberAccessFlags::SKIP_GET_ATTRIBUTE_CHECK
            | MemberAccessFlags::SKIP_GET_CHECK
    }
}

/// Construct the synthesized `self`/`cls`-first parameter a method gets
/// before binding strips it back off; used by dataclass/`NamedTuple`
/// synthesis (§4.5) when assembling a `Function` from scratch.
#[must_use]
pub fn leading_param(name: &str, ty: Type) -> Param {
    Param::simple(name, ty)
}

#[must_use]
pub fn is_instance_method(flags: FunctionFlags) -> bool {
    flags.contains(FunctionFlags::INSTANCE_METHOD)
}
