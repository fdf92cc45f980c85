//! The "analyzer annotations" interface consumed from an external pass
//! that ran before this evaluator did (§6: "Consumed from analyzer
//! annotations: `getExpressionType(node) -> Type?` (used only for
//! previously-analyzed lambdas and enclosing functions)").
//!
//! Lambda bodies and `yield`/`yield from` expressions both need a type
//! that isn't derivable from the node's own subtree — a lambda's
//! contextually-inferred parameter types, or an enclosing generator
//! function's declared "send" type. Both are the product of analysis this
//! evaluator does not itself perform; `ExpressionAnnotations` is the seam
//! where that prior pass's results come in.

use tyeval_ast::NodeId;
use tyeval_types::Type;

/// Read-only lookup of a previously-computed expression type, keyed by
/// node. Returns `None` when no prior analysis pinned a type for `node` —
/// callers fall back to their own derivation in that case rather than
/// treating `None` as an error.
pub trait ExpressionAnnotations {
    fn get_expression_type(&self, node: NodeId) -> Option<Type>;
}

/// An `ExpressionAnnotations` that never has anything on file, for
/// drivers and tests that don't model a prior analysis pass.
#[derive(Default)]
pub struct NoAnnotations;

impl ExpressionAnnotations for NoAnnotations {
    fn get_expression_type(&self, _node: NodeId) -> Option<Type> {
        None
    }
}
