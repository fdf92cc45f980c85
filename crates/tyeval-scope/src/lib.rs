//! Scope, symbol-lookup, and narrowing-constraint interfaces consumed by
//! the expression evaluator. Everything here is a trait or a thin helper
//! over one; the actual scope/symbol builder and narrowing-constraint
//! builder live outside this crate's (and this exercise's) scope.

pub mod annotations;
pub mod constraint;
pub mod scope;

pub use annotations::{ExpressionAnnotations, NoAnnotations};
pub use constraint::{ConditionalConstraints, Constraint, NarrowingBuilder};
pub use scope::{get_builtin_object, get_builtin_type, Scope, ScopeKind, SymbolLookup};
