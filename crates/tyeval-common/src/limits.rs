//! Centralized recursion limits for the evaluator.
//!
//! §5 calls recursion depth "the only failure vector not otherwise
//! catchable" and recommends a guard counter with a diagnostic on overflow
//! rather than a process abort. These constants are that guard's thresholds,
//! gathered in one place so they can be tuned together.

/// Maximum depth of recursive expression evaluation (`getType` calling back
/// into itself through sub-expressions).
///
/// A deeply nested chain of binary operators, calls, or member accesses
/// walks the parse tree one frame per level; past this depth the evaluator
/// reports an internal diagnostic and returns `Unknown` instead of
/// overflowing the native stack.
pub const MAX_EXPR_EVAL_DEPTH: u32 = 500;

/// Maximum depth of generic specialization recursion.
///
/// Bounds `specializeType` / `cloneForSpecialization` when a generic class
/// or function refers to itself through its own type arguments.
pub const MAX_SPECIALIZATION_DEPTH: u32 = 64;

/// Maximum number of constraint frames the narrowing stack (C7) may hold at
/// once. Exceeding this indicates a push without a matching pop and is a
/// structural invariant failure, not a user-facing diagnostic.
pub const MAX_NARROWING_STACK_DEPTH: u32 = 256;
