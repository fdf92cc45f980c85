//! The central `Type` value (§3): a closed, cheaply-`Clone`able
//! discriminated union. Every variant but `Union` is either a unit value or
//! an `Arc`-wrapped handle, so cloning a `Type` never deep-copies a class's
//! field maps or a function's parameter list.

use std::sync::Arc;

use tyeval_ast::NodeId;

use crate::class::ClassType;
use crate::function::FunctionType;
use crate::typevar::TypeVarDetails;

/// A module's exported symbol table, looked up by `getTypeFromModule`-style
/// callers (§C3). Kept minimal here; the evaluator never constructs one, it
/// only receives `Arc<ModuleType>` handles from the (out-of-scope) binder.
#[derive(Debug)]
pub struct ModuleType {
    pub name: String,
    pub members: indexmap::IndexMap<String, crate::symbol::Symbol>,
}

/// A `property`-backed attribute: a getter and, optionally, a setter and
/// deleter, each an ordinary `Function` (§3: "Property").
#[derive(Debug)]
pub struct PropertyType {
    pub getter: Arc<FunctionType>,
    pub setter: Option<Arc<FunctionType>>,
    pub deleter: Option<Arc<FunctionType>>,
}

/// The evaluator's value domain (§3). `Clone` is O(1) for every variant.
#[derive(Clone, Debug)]
pub enum Type {
    /// Evaluation could not determine a type (error recovery, unresolved
    /// import, etc.) — propagates silently, never itself reported (§4.6).
    Unknown,
    /// Gradual `Any`. `is_ellipsis` marks the `...` placeholder used in
    /// `Callable[..., R]` and variadic stand-ins (§3).
    Any { is_ellipsis: bool },
    /// The singleton `None` value's type (distinct from `Unknown`).
    None,
    /// The bottom type: unreachable code, `NoReturn` returns.
    Never,
    /// A reference to a class itself (`type[C]`), as opposed to an instance.
    Class(Arc<ClassType>),
    /// An instance of a class. `truthy` is `Some(_)` only when narrowing has
    /// pinned the instance's truth value (§4.6, removeTruthiness/Falsiness);
    /// `None` means "unknown, ask `__bool__`/`__len__` at use sites that care".
    Object {
        class_type: Arc<ClassType>,
        truthy: Option<bool>,
    },
    Function(Arc<FunctionType>),
    /// An `@overload`ed function: an ordered list of candidate signatures,
    /// tried in order by the call matcher (§4.3).
    OverloadedFunction(Arc<Vec<FunctionType>>),
    Module(Arc<ModuleType>),
    /// Never nested, never empty, never a singleton — `combine_types` (§4.2)
    /// is the only constructor that should ever produce one, and it upholds
    /// those invariants by construction.
    Union(Arc<Vec<Type>>),
    TypeVar(Arc<TypeVarDetails>),
    Property(Arc<PropertyType>),
}

impl Type {
    #[must_use]
    pub fn any() -> Type {
        Type::Any { is_ellipsis: false }
    }

    #[must_use]
    pub fn object(class_type: Arc<ClassType>) -> Type {
        Type::Object {
            class_type,
            truthy: None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any { .. })
    }

    /// §4.2: "Any and Unknown are both treated as the indeterminate type for
    /// assignability purposes" — the one place the two are deliberately
    /// conflated.
    #[must_use]
    pub fn is_any_or_unknown(&self) -> bool {
        matches!(self, Type::Unknown | Type::Any { .. })
    }

    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Type::None)
    }

    #[must_use]
    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    /// Iterate this type's subtypes: a `Union`'s members, or the type itself
    /// as a single-element sequence for anything else. Used by `doForSubtypes`
    /// (§4.2) callers that want an iterator rather than a callback.
    pub fn subtypes(&self) -> Box<dyn Iterator<Item = &Type> + '_> {
        match self {
            Type::Union(members) => Box::new(members.iter()),
            other => Box::new(std::iter::once(other)),
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&Arc<ClassType>> {
        match self {
            Type::Class(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Arc<ClassType>> {
        match self {
            Type::Object { class_type, .. } => Some(class_type),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&Arc<FunctionType>> {
        match self {
            Type::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// The result of evaluating an expression node (§3): the resolved `Type`
/// plus, for call/subscript expressions that distribute over multiple
/// overload candidates or tuple elements, the per-element breakdown the
/// caller may need without re-evaluating.
#[derive(Clone, Debug)]
pub struct TypeResult {
    pub r#type: Type,
    pub type_list: Option<Vec<TypeResult>>,
    pub node: NodeId,
}

impl TypeResult {
    #[must_use]
    pub fn simple(r#type: Type, node: NodeId) -> Self {
        TypeResult {
            r#type,
            type_list: None,
            node,
        }
    }
}
