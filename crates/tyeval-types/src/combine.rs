//! §4.2: `combineTypes` and `doForSubtypes` — the two operations every other
//! C2 utility is built from.

use crate::ty::Type;

/// Flatten and de-duplicate a list of types into a single `Type`, upholding
/// `Union`'s invariants: never nested, never empty, never a singleton.
///
/// - Zero inputs collapses to `Never` (the identity element for "no subtype
///   reached here").
/// - One distinct input after de-duplication collapses to that input
///   itself, not a one-element `Union`.
/// - Any `Union` among the inputs is flattened rather than nested.
///
/// De-duplication is by `Type`'s structural shape where cheaply comparable
/// (`Unknown`, `Any`, `None`, `Never`, and `Class`/`Object` by class
/// identity); distinct `Function`/`TypeVar`/`Property` values are always
/// kept even if they'd render identically, since the evaluator has no total
/// equality for those (§8: "no spurious union wrapping" only promises no
/// *duplicate* collapsing of the cheap cases).
#[must_use]
pub fn combine_types(types: impl IntoIterator<Item = Type>) -> Type {
    let mut flat: Vec<Type> = Vec::new();
    for t in types {
        match t {
            Type::Union(members) => {
                for m in members.iter() {
                    push_dedup(&mut flat, m.clone());
                }
            }
            other => push_dedup(&mut flat, other),
        }
    }

    match flat.len() {
        0 => Type::Never,
        1 => flat.into_iter().next().unwrap(),
        _ => Type::Union(std::sync::Arc::new(flat)),
    }
}

fn push_dedup(flat: &mut Vec<Type>, candidate: Type) {
    if flat.iter().any(|existing| cheaply_equal(existing, &candidate)) {
        return;
    }
    flat.push(candidate);
}

fn cheaply_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Unknown, Type::Unknown) => true,
        (Type::Any { is_ellipsis: e1 }, Type::Any { is_ellipsis: e2 }) => e1 == e2,
        (Type::None, Type::None) => true,
        (Type::Never, Type::Never) => true,
        (Type::Class(c1), Type::Class(c2)) => crate::class::is_same_generic_class(c1, c2),
        (Type::Object { class_type: c1, .. }, Type::Object { class_type: c2, .. }) => {
            crate::class::is_same_generic_class(c1, c2)
        }
        (Type::TypeVar(v1), Type::TypeVar(v2)) => v1 == v2,
        _ => false,
    }
}

/// Apply `f` to every subtype of `t` (a `Union`'s members, or `t` itself
/// for anything else) and recombine the results with `combine_types`.
///
/// Identity law (§8): `do_for_subtypes(t, |s| s.clone())` always returns a
/// type equivalent to `t` — `combine_types` re-flattening a `Union`'s own
/// members back into itself is exactly what upholds that, since a `Union`
/// can never have been built with duplicates or nested members in the
/// first place.
pub fn do_for_subtypes(t: &Type, mut f: impl FnMut(&Type) -> Type) -> Type {
    combine_types(t.subtypes().map(|s| f(s)))
}
