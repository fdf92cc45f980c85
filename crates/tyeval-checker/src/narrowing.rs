//! C7: narrowing glue — the expression-local constraint stack plus the
//! scope-chain walk (§4.6).
//!
//! Construction of individual constraints is entirely the narrowing
//! builder's job (`tyeval_scope::NarrowingBuilder`); this module only
//! applies whatever constraints are currently in force to a freshly
//! computed type.

use std::sync::Arc;

use smallvec::SmallVec;
use tyeval_ast::NodeId;
use tyeval_scope::{Constraint, Scope, ScopeKind};
use tyeval_types::Type;

/// The expression-local stack of narrowing constraints pushed around a
/// conditional's branches (§4.6: truthy before `if`'s then-branch and
/// `and`'s right operand; falsy before the `else`-branch and `or`'s right
/// operand).
///
/// Backed by a `SmallVec` rather than a dedicated RAII guard: the
/// dispatcher's branches already go through `?`/early-return paths inside
/// `get_type`, and a push paired with an explicit pop in a `let result = {
/// ... }; pop; result` shape is simpler to audit for "popped on every
/// exit" than threading a guard value through match arms that return
/// early. Four inline slots cover all but the most deeply nested chains of
/// `and`/`or`/ternary before falling back to the heap.
#[derive(Default)]
pub struct ConstraintStack {
    frames: SmallVec<[Arc<dyn Constraint>; 4]>,
}

impl ConstraintStack {
    #[must_use]
    pub fn new() -> Self {
        ConstraintStack {
            frames: SmallVec::new(),
        }
    }

    pub fn push_all(&mut self, constraints: &[Arc<dyn Constraint>]) -> usize {
        self.frames.extend(constraints.iter().cloned());
        constraints.len()
    }

    /// Pop exactly `count` frames. Called unconditionally after the branch
    /// that pushed them returns, regardless of whether evaluating the
    /// branch itself produced a diagnostic (§5: "Push/pop is
    /// exception-safe").
    pub fn pop(&mut self, count: usize) {
        let new_len = self.frames.len().saturating_sub(count);
        self.frames.truncate(new_len);
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn iter_innermost_first(&self) -> impl Iterator<Item = &Arc<dyn Constraint>> {
        self.frames.iter().rev()
    }
}

/// Apply every constraint currently in force — first the expression-local
/// stack (innermost pushed frame first), then the scope chain walking
/// upward from `scope` through `Temporary` scopes — to `computed`.
///
/// A constraint's `block_subsequent_constraints(node)` stops the walk
/// immediately: neither the remaining local frames nor any further scope
/// in the chain get a chance to narrow the type further for this node.
/// `scope` itself is always consulted (its `Temporary`/`Permanent` kind
/// only gates whether its *parent* is walked, per §4.6: "from the current
/// scope upward through temporary scopes only").
#[must_use]
pub fn apply_narrowing(
    local_stack: &ConstraintStack,
    scope: &dyn Scope,
    node: NodeId,
    computed: Type,
) -> Type {
    let mut current = computed;

    for constraint in local_stack.iter_innermost_first() {
        current = constraint.apply_to_type(node, &current);
        if constraint.block_subsequent_constraints(node) {
            return current;
        }
    }

    let mut scope_opt: Option<&dyn Scope> = Some(scope);
    let mut first = true;
    while let Some(s) = scope_opt {
        if !first && s.scope_kind() != ScopeKind::Temporary {
            break;
        }
        first = false;

        for constraint in s.type_constraints() {
            current = constraint.apply_to_type(node, &current);
            if constraint.block_subsequent_constraints(node) {
                return current;
            }
        }

        scope_opt = s.parent();
    }

    current
}
