//! `getType`'s `usage` and `flags` parameters (§2: "a public entry
//! `getType(node, usage, flags)`").
//!
//! Neither is large enough to earn its own module elsewhere, but both are
//! threaded through every dispatcher subroutine (§4.4), so they live here
//! rather than inline in `dispatch.rs`.

bitflags::bitflags! {
    /// Evaluation-mode flags threaded through `get_type` and its recursive
    /// calls.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GetTypeFlags: u8 {
        /// This expression is being evaluated as a type annotation (the
        /// right-hand side of `x: <here>` or a special-form argument),
        /// not as an ordinary value expression. A bare `Class` reference
        /// evaluates to `Object(C)` under this flag instead of `Class(C)`
        /// (§4.4, TypeAnnotation).
        const EXPECTING_TYPE = 1 << 0;
        /// Skip narrowing glue (C7) entirely for this call. Set by the
        /// narrowing builder itself while it evaluates a conditional
        /// test's subexpressions, so building a constraint from `x` does
        /// not recursively re-narrow `x` by a constraint not yet pushed.
        const SKIP_NARROWING = 1 << 1;
    }
}

/// What a `getType` call is evaluating a node *for* (§4.2's `Get`/`Set`/
/// `Delete` usage, lifted to the expression dispatcher's own entry point
/// so an assignment target and a plain read of the same `Name` node can be
/// told apart without a second node kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeUsage {
    Read,
    Write,
    Delete,
}

impl Default for TypeUsage {
    fn default() -> Self {
        TypeUsage::Read
    }
}
