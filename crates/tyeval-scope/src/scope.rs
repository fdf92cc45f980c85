//! The `Scope` interface consumed from the (out-of-scope) scope builder
//! (§6: "Consumed from scope builder").
//!
//! The evaluator never constructs a `Scope` itself; it is handed one per
//! `getType` call and only ever walks upward through it.

use tyeval_types::Symbol;

/// Whether a scope persists past the statement that created it. Only
/// `Temporary` scopes participate in narrowing's upward walk (§4.6: "from
/// the current scope upward through temporary scopes only").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Temporary,
    Permanent,
}

/// The result of a successful `look_up_symbol_recursive` — the symbol found
/// plus the scope that owns it, since narrowing constraints are applied
/// relative to the *owning* scope, not the scope the lookup started from.
pub struct SymbolLookup<'a> {
    pub symbol: Symbol,
    pub owning_scope: &'a dyn Scope,
}

/// Callback surface the expression evaluator requires from a lexical scope.
///
/// Implementations wrap whatever the scope/symbol builder's own
/// representation is; tests implement this directly over a small in-memory
/// map (see `tyeval_checker`'s test fakes).
pub trait Scope {
    /// Resolve `name` in this scope, then its parents, stopping at the
    /// first match (§6: `lookUpSymbolRecursive(name) -> {symbol, scope}?`).
    fn look_up_symbol_recursive(&self, name: &str) -> Option<SymbolLookup<'_>>;

    /// The lexically enclosing scope, or `None` at the module/global root.
    fn parent(&self) -> Option<&dyn Scope>;

    fn scope_kind(&self) -> ScopeKind;

    /// Constraints narrowing applies to types computed while this scope is
    /// in effect (§4.6). Construction of individual constraints is
    /// delegated entirely to the narrowing builder; a `Scope` only reports
    /// which ones are currently active.
    fn type_constraints(&self) -> &[std::sync::Arc<dyn crate::constraint::Constraint>];
}

/// §6 helper: `getBuiltInType(scope, name)`. Implemented by walking
/// `look_up_symbol_recursive` up to the module scope that defines builtins,
/// rather than requiring a dedicated scope method — per §6, these are
/// free-standing helpers layered over the lookup primitive, not part of the
/// `Scope` trait's own surface.
#[must_use]
pub fn get_builtin_type(scope: &dyn Scope, name: &str) -> Option<tyeval_types::Type> {
    scope
        .look_up_symbol_recursive(name)
        .map(|lookup| lookup.symbol.effective_type())
}

/// §6 helper: `getBuiltInObject(scope, name, typeArgs?)` — resolve a
/// built-in class by name and return an `Object` of it, optionally
/// specialized.
#[must_use]
pub fn get_builtin_object(
    scope: &dyn Scope,
    name: &str,
    type_args: Option<Vec<tyeval_types::Type>>,
) -> Option<tyeval_types::Type> {
    let ty = get_builtin_type(scope, name)?;
    let class = ty.as_class()?;
    let class = match type_args {
        Some(args) => class.clone_for_specialization(args),
        None => class.clone(),
    };
    Some(tyeval_types::Type::object(class))
}
