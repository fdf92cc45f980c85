//! The `Constraint` / narrowing-builder interface consumed from the
//! (out-of-scope) narrowing builder (§6: "Consumed from narrowing builder").
//!
//! Construction of constraints is entirely delegated; the evaluator only
//! applies them (§4.6's "push/pop of conditional type constraints").

use tyeval_ast::NodeId;
use tyeval_types::Type;

/// A single narrowing fact in force for some node. `apply_to_type` refines
/// a type at a use site; `block_subsequent_constraints` lets a constraint
/// that has already fully determined a type (e.g. an `isinstance` narrowing
/// down to a single concrete class) suppress weaker constraints further up
/// the scope chain.
pub trait Constraint {
    fn apply_to_type(&self, node: NodeId, t: &Type) -> Type;

    fn block_subsequent_constraints(&self, node: NodeId) -> bool;
}

/// The pair of constraint sets produced by evaluating a conditional's test
/// expression: what narrowing applies on the truthy branch, and on the
/// falsy one (§6).
pub struct ConditionalConstraints {
    pub if_constraints: Vec<std::sync::Arc<dyn Constraint>>,
    pub else_constraints: Vec<std::sync::Arc<dyn Constraint>>,
}

/// `buildTypeConstraintsForConditional(node, evalFn)` (§6). `eval_fn` is
/// the callback the builder uses to evaluate the test expression's operand
/// subtrees as it derives constraints from them; the evaluator passes in
/// its own `getType` so the builder never needs its own copy of the
/// dispatcher.
pub trait NarrowingBuilder {
    fn build_type_constraints_for_conditional(
        &self,
        node: NodeId,
        eval_fn: &mut dyn FnMut(NodeId) -> Type,
    ) -> ConditionalConstraints;
}
