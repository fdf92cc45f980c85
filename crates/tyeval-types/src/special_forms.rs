//! §4.5: `Callable`, `Optional`, `Union`, `Type`, `Tuple`, `List`, `Set`,
//! `FrozenSet`, `Deque`, `Dict`, `DefaultDict`, `ChainMap`, `Protocol`,
//! `ClassVar`, `Generic`, and the `TypeVar()` constructor.
//!
//! None of these functions look a built-in class up themselves — `getType`
//! callers in the expression dispatcher (C5) resolve the relevant class via
//! the injected `Scope::get_builtin_type`/`get_builtin_object` and hand it
//! here already resolved, keeping this module free of any scope dependency.

use std::sync::Arc;

use crate::class::ClassType;
use crate::combine::combine_types;
use crate::function::{FunctionFlags, FunctionType, Param};
use crate::ty::Type;
use crate::typevar::{TypeVarDetails, Variance};

/// An arity or shape violation in a special-form subscription, reported at
/// the offending node by the caller (§4.5: "Arity violations are reported
/// at the offending node").
#[derive(Clone, Debug)]
pub struct SpecialFormError(pub String);

type Result<T> = std::result::Result<T, SpecialFormError>;

fn err(message: impl Into<String>) -> SpecialFormError {
    SpecialFormError(message.into())
}

/// `Optional[T]` — sugar for `Union[T, None]`.
#[must_use]
pub fn make_optional(t: Type) -> Type {
    combine_types([t, Type::None])
}

/// `Union[A, B, ...]` — identical to `combineTypes`.
pub fn make_union(args: Vec<Type>) -> Result<Type> {
    if args.is_empty() {
        return Err(err("Union requires at least one type argument"));
    }
    Ok(combine_types(args))
}

/// `Callable[[P1, P2, ...], R]` (or `Callable[..., R]` when `params` is
/// `None`, preserving the ellipsis).
#[must_use]
pub fn make_callable(params: Option<Vec<Type>>, return_type: Type) -> Type {
    let parameters = match params {
        Some(ps) => ps
            .into_iter()
            .enumerate()
            .map(|(i, ty)| Param::simple(format!("__p{i}"), ty))
            .collect(),
        None => vec![Param {
            category: crate::function::ParamCategory::VarArgList,
            name: None,
            has_default: false,
            default_type: None,
            r#type: Type::Any { is_ellipsis: true },
        }],
    };
    Type::Function(Arc::new(FunctionType {
        name: "Callable".to_string(),
        flags: FunctionFlags::empty(),
        parameters,
        declared_return_type: Some(return_type),
        inferred_return_type: None,
        built_in_name: None,
    }))
}

/// `Type[T]` — represented as the `type` class specialized with `T` as its
/// sole type argument.
#[must_use]
pub fn make_type_of(t: Type, type_class: Arc<ClassType>) -> Type {
    Type::Class(type_class.clone_for_specialization(vec![t]))
}

/// `Tuple[A, B, ...]` / `Tuple[A, ...]` (homogeneous, ellipsis in last
/// position only). `has_trailing_ellipsis` marks the homogeneous form.
pub fn make_tuple(
    element_types: Vec<Type>,
    has_trailing_ellipsis: bool,
    tuple_class: Arc<ClassType>,
) -> Result<Type> {
    if element_types.is_empty() {
        return Err(err("Tuple requires at least one type argument"));
    }
    if has_trailing_ellipsis && element_types.len() != 2 {
        return Err(err("Ellipsis is only allowed directly after a single element type"));
    }
    Ok(Type::Class(tuple_class.clone_for_specialization(element_types)))
}

/// Single-argument generic containers: `List`, `Set`, `FrozenSet`,
/// `Deque` (all ≤ 1 type argument per §4.5).
pub fn make_single_arg_container(
    element_type: Option<Type>,
    class: Arc<ClassType>,
) -> Result<Type> {
    let args = match element_type {
        Some(t) => vec![t],
        None => vec![],
    };
    if args.len() > 1 {
        return Err(err(format!("{} accepts at most one type argument", class.name)));
    }
    Ok(Type::Class(class.clone_for_specialization(args)))
}

/// Two-argument generic mappings: `Dict`, `DefaultDict`, `ChainMap`
/// (`ChainMap` restricted to ≤ 2 args per §4.5).
pub fn make_mapping(
    key_type: Option<Type>,
    value_type: Option<Type>,
    class: Arc<ClassType>,
) -> Result<Type> {
    let args = match (key_type, value_type) {
        (Some(k), Some(v)) => vec![k, v],
        (Some(k), None) => vec![k],
        (None, None) => vec![],
        (None, Some(_)) => return Err(err(format!("{} requires a key type before a value type", class.name))),
    };
    Ok(Type::Class(class.clone_for_specialization(args)))
}

/// `Protocol[T1, ...]` — unbounded arity.
#[must_use]
pub fn make_protocol(type_args: Vec<Type>, protocol_class: Arc<ClassType>) -> Type {
    Type::Class(protocol_class.clone_for_specialization(type_args))
}

/// `Generic[T1, ...]` — requires at least one type argument, all unique
/// `TypeVar`s.
pub fn make_generic(type_args: Vec<Type>, generic_class: Arc<ClassType>) -> Result<Type> {
    if type_args.is_empty() {
        return Err(err("Generic requires at least one type argument"));
    }
    let mut seen_ids = Vec::with_capacity(type_args.len());
    for arg in &type_args {
        match arg {
            Type::TypeVar(v) => {
                if seen_ids.contains(&v.id) {
                    return Err(err(format!("Duplicate type variable '{}' in Generic", v.name)));
                }
                seen_ids.push(v.id);
            }
            _ => return Err(err("Generic arguments must all be type variables")),
        }
    }
    Ok(Type::Class(generic_class.clone_for_specialization(type_args)))
}

/// `ClassVar[T]` — represented as the marker class specialized with `T`.
#[must_use]
pub fn make_class_var(t: Type, class_var_class: Arc<ClassType>) -> Type {
    Type::Class(class_var_class.clone_for_specialization(vec![t]))
}

/// Keyword arguments recognized by the `TypeVar()` constructor (§4.5).
#[derive(Default)]
pub struct TypeVarConstructorArgs {
    pub name: String,
    pub constraints: Vec<Type>,
    pub bound: Option<Type>,
    pub covariant: bool,
    pub contravariant: bool,
}

/// `TypeVar(name, *constraints, bound=..., covariant=..., contravariant=...)`.
///
/// Errors (§4.5): bounded and constrained simultaneously; covariant and
/// contravariant simultaneously.
pub fn make_type_var(args: TypeVarConstructorArgs, id: u32) -> Result<TypeVarDetails> {
    if args.bound.is_some() && !args.constraints.is_empty() {
        return Err(err("A type variable cannot be both bound and constrained"));
    }
    if args.covariant && args.contravariant {
        return Err(err("A type variable cannot be both covariant and contravariant"));
    }
    let variance = if args.covariant {
        Variance::Covariant
    } else if args.contravariant {
        Variance::Contravariant
    } else {
        Variance::Invariant
    };
    Ok(TypeVarDetails {
        name: args.name,
        bound: args.bound.map(Box::new),
        constraints: args.constraints,
        variance,
        id,
    })
}
