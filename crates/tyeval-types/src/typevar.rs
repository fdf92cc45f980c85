//! `TypeVar` details (§3) and variance.

use crate::ty::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

/// A type variable's identity and constraints.
///
/// Invariants (§3): never both `bound` and non-empty `constraints`; never
/// both covariant and contravariant (the latter is structurally impossible
/// here since `Variance` is a single enum, not two booleans — see
/// `special_forms::make_type_var` for where the "both" error is actually
/// raised, at construction time from `covariant=` / `contravariant=`
/// keyword arguments).
#[derive(Clone, Debug)]
pub struct TypeVarDetails {
    pub name: String,
    pub bound: Option<Box<Type>>,
    pub constraints: Vec<Type>,
    pub variance: Variance,
    /// Identity for `TypeVarMap` keys and Union/TypeVar equality. Two
    /// `TypeVar`s with the same name are still distinct type variables
    /// unless they share an id (e.g. the same `TypeVar("T")` call site
    /// reused across specializations).
    pub id: u32,
}

impl TypeVarDetails {
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.bound.is_some()
    }

    #[must_use]
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty()
    }
}

impl PartialEq for TypeVarDetails {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for TypeVarDetails {}
