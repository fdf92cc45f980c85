//! C6 wiring: recognizing a subscription or call of a special built-in
//! (`Callable`, `Optional`, `Union`, ... §4.5) from the expression
//! dispatcher and routing it to `tyeval_types::special_forms`.
//!
//! `tyeval_types::special_forms` itself has no scope dependency (§4.5's
//! module doc); this module is exactly the seam that resolves builtin
//! classes through `Scope` and reads literal argument nodes before handing
//! already-evaluated types to those pure constructors.

use std::sync::Arc;

use tyeval_ast::{Argument, ArgumentCategory, ConstantKind, ExprKind, KeywordType, NodeId};
use tyeval_common::span::TextRange;
use tyeval_types::special_forms::{self as sf, TypeVarConstructorArgs};
use tyeval_types::{ClassType, NamedTupleFields, Type};

use crate::dispatch::Evaluator;
use crate::flags::{GetTypeFlags, TypeUsage};

/// Evaluate `node` as a type expression rather than a value expression
/// (§4.4 TypeAnnotation; §4.5's constructors all take already-evaluated
/// `Type`s built this way).
pub fn eval_type_annotation(evaluator: &mut Evaluator<'_>, node: NodeId) -> Type {
    evaluator.get_type(node, TypeUsage::Read, GetTypeFlags::EXPECTING_TYPE)
}

fn tuple_elements(evaluator: &Evaluator<'_>, node: NodeId) -> Vec<NodeId> {
    match &evaluator.arena.get(node).kind {
        ExprKind::Tuple(items) => items.clone(),
        _ => vec![node],
    }
}

fn report(evaluator: &mut Evaluator<'_>, range: TextRange, message: impl Into<String>) -> Type {
    evaluator.sink.error(range, message.into());
    Type::Unknown
}

/// §4.5 dispatch for `Class[...]` subscription. Returns `None` when
/// `class` is not one of the recognized special built-ins — callers fall
/// back to plain generic specialization in that case.
pub fn try_subscribe_special_form(
    evaluator: &mut Evaluator<'_>,
    class: &Arc<ClassType>,
    index_node: NodeId,
    range: TextRange,
) -> Option<Type> {
    if !class.is_special_built_in() {
        return None;
    }

    let result = match class.name.as_str() {
        "Callable" => subscribe_callable(evaluator, index_node),
        "Optional" => Ok(sf::make_optional(eval_type_annotation(evaluator, index_node))),
        "Union" => sf::make_union(eval_type_arg_list(evaluator, index_node)),
        "Type" => Ok(sf::make_type_of(
            eval_type_annotation(evaluator, index_node),
            class.clone(),
        )),
        "Tuple" => subscribe_tuple(evaluator, index_node, class.clone()),
        "List" | "Set" | "FrozenSet" | "Deque" => {
            subscribe_single_arg_container(evaluator, index_node, class.clone())
        }
        "Dict" | "DefaultDict" | "ChainMap" => {
            subscribe_mapping(evaluator, index_node, class.clone())
        }
        "Protocol" => Ok(sf::make_protocol(
            eval_type_arg_list(evaluator, index_node),
            class.clone(),
        )),
        "ClassVar" => Ok(sf::make_class_var(
            eval_type_annotation(evaluator, index_node),
            class.clone(),
        )),
        "Generic" => sf::make_generic(eval_type_arg_list(evaluator, index_node), class.clone()),
        _ => return None,
    };

    Some(match result {
        Ok(ty) => ty,
        Err(e) => report(evaluator, range, e.0),
    })
}

fn eval_type_arg_list(evaluator: &mut Evaluator<'_>, index_node: NodeId) -> Vec<Type> {
    tuple_elements(evaluator, index_node)
        .into_iter()
        .map(|n| eval_type_annotation(evaluator, n))
        .collect()
}

fn subscribe_callable(
    evaluator: &mut Evaluator<'_>,
    index_node: NodeId,
) -> Result<Type, sf::SpecialFormError> {
    let elems = tuple_elements(evaluator, index_node);
    let [params_node, return_node] = elems.as_slice() else {
        return Err(sf::SpecialFormError(
            "Callable requires exactly a parameter list and a return type".to_string(),
        ));
    };

    let params = match &evaluator.arena.get(*params_node).kind {
        ExprKind::Constant(ConstantKind::Ellipsis) => None,
        ExprKind::List(items) => {
            let items = items.clone();
            Some(
                items
                    .into_iter()
                    .map(|n| eval_type_annotation(evaluator, n))
                    .collect(),
            )
        }
        _ => {
            return Err(sf::SpecialFormError(
                "Callable's first argument must be a parameter list or '...'".to_string(),
            ))
        }
    };
    let return_type = eval_type_annotation(evaluator, *return_node);
    Ok(sf::make_callable(params, return_type))
}

fn subscribe_tuple(
    evaluator: &mut Evaluator<'_>,
    index_node: NodeId,
    class: Arc<ClassType>,
) -> Result<Type, sf::SpecialFormError> {
    let elems = tuple_elements(evaluator, index_node);
    let has_trailing_ellipsis = elems.len() >= 2
        && matches!(
            evaluator.arena.get(*elems.last().unwrap()).kind,
            ExprKind::Constant(ConstantKind::Ellipsis)
        );
    let element_types: Vec<Type> = elems
        .into_iter()
        .map(|n| eval_type_annotation(evaluator, n))
        .collect();
    sf::make_tuple(element_types, has_trailing_ellipsis, class)
}

fn subscribe_single_arg_container(
    evaluator: &mut Evaluator<'_>,
    index_node: NodeId,
    class: Arc<ClassType>,
) -> Result<Type, sf::SpecialFormError> {
    if let ExprKind::Tuple(items) = &evaluator.arena.get(index_node).kind {
        if items.len() > 1 {
            return Err(sf::SpecialFormError(format!(
                "{} accepts at most one type argument",
                class.name
            )));
        }
        if let Some(&only) = items.first() {
            let ty = eval_type_annotation(evaluator, only);
            return sf::make_single_arg_container(Some(ty), class);
        }
        return sf::make_single_arg_container(None, class);
    }
    let ty = eval_type_annotation(evaluator, index_node);
    sf::make_single_arg_container(Some(ty), class)
}

fn subscribe_mapping(
    evaluator: &mut Evaluator<'_>,
    index_node: NodeId,
    class: Arc<ClassType>,
) -> Result<Type, sf::SpecialFormError> {
    let elems = tuple_elements(evaluator, index_node);
    match elems.len() {
        0 => sf::make_mapping(None, None, class),
        1 => {
            let key = eval_type_annotation(evaluator, elems[0]);
            sf::make_mapping(Some(key), None, class)
        }
        2 => {
            let key = eval_type_annotation(evaluator, elems[0]);
            let value = eval_type_annotation(evaluator, elems[1]);
            sf::make_mapping(Some(key), Some(value), class)
        }
        _ => Err(sf::SpecialFormError(format!(
            "{} accepts at most two type arguments",
            class.name
        ))),
    }
}

fn literal_str(evaluator: &Evaluator<'_>, node: NodeId) -> Option<String> {
    match &evaluator.arena.get(node).kind {
        ExprKind::Constant(ConstantKind::Str { value, .. }) => value.clone(),
        _ => None,
    }
}

fn literal_bool(evaluator: &Evaluator<'_>, node: NodeId) -> Option<bool> {
    match &evaluator.arena.get(node).kind {
        ExprKind::Constant(ConstantKind::Keyword(KeywordType::True)) => Some(true),
        ExprKind::Constant(ConstantKind::Keyword(KeywordType::False)) => Some(false),
        _ => None,
    }
}

/// §4.5: `TypeVar(name, *constraints, bound=..., covariant=..., contravariant=...)`
/// invoked as a call, recognized by `built_in_name == "TypeVar"` on the
/// resolved callee (§3 `FunctionType::built_in_name`, the same field the
/// numeric-promotion dispatch uses to flag built-in operator
/// implementations).
pub fn try_call_type_var(
    evaluator: &mut Evaluator<'_>,
    args: &[Argument],
    range: TextRange,
) -> Type {
    let mut positionals = args.iter().filter(|a| a.category == ArgumentCategory::Simple && a.name.is_none());
    let Some(name_arg) = positionals.next().and_then(|a| a.value) else {
        return report(evaluator, range, "TypeVar() requires a name as its first argument");
    };
    let Some(name) = literal_str(evaluator, name_arg) else {
        return report(evaluator, range, "TypeVar()'s first argument must be a string literal");
    };

    let mut ctor_args = TypeVarConstructorArgs {
        name,
        ..Default::default()
    };
    for arg in positionals {
        if let Some(value) = arg.value {
            ctor_args.constraints.push(eval_type_annotation(evaluator, value));
        }
    }
    for arg in args.iter().filter(|a| a.name.is_some()) {
        let Some(value) = arg.value else { continue };
        match arg.name.as_deref() {
            Some("bound") => ctor_args.bound = Some(eval_type_annotation(evaluator, value)),
            Some("covariant") => ctor_args.covariant = literal_bool(evaluator, value).unwrap_or(false),
            Some("contravariant") => {
                ctor_args.contravariant = literal_bool(evaluator, value).unwrap_or(false)
            }
            _ => {}
        }
    }

    match sf::make_type_var(ctor_args, evaluator.next_type_var_id()) {
        Ok(details) => Type::TypeVar(Arc::new(details)),
        Err(e) => report(evaluator, range, e.0),
    }
}

/// §4.5: `NamedTuple(name, fields)`, recognized by `built_in_name ==
/// "NamedTuple"`.
pub fn try_call_named_tuple(evaluator: &mut Evaluator<'_>, args: &[Argument], range: TextRange) -> Type {
    let mut positionals = args
        .iter()
        .filter(|a| a.category == ArgumentCategory::Simple && a.name.is_none());

    let Some(name_node) = positionals.next().and_then(|a| a.value) else {
        return report(evaluator, range, "NamedTuple() requires a name as its first argument");
    };
    let Some(name) = literal_str(evaluator, name_node) else {
        return report(evaluator, range, "NamedTuple()'s first argument must be a string literal");
    };

    let fields = match positionals.next().and_then(|a| a.value) {
        None => NamedTupleFields::Dynamic,
        Some(fields_node) => classify_named_tuple_fields(evaluator, fields_node),
    };

    let Some(object_class) = evaluator.builtin_class("object") else {
        return report(evaluator, range, "NamedTuple() requires the 'object' builtin to be registered");
    };
    let Some(str_class) = evaluator.builtin_class("str") else {
        return report(evaluator, range, "NamedTuple() requires the 'str' builtin to be registered");
    };
    let Some(int_class) = evaluator.builtin_class("int") else {
        return report(evaluator, range, "NamedTuple() requires the 'int' builtin to be registered");
    };
    let Some(list_class) = evaluator.builtin_class("list") else {
        return report(evaluator, range, "NamedTuple() requires the 'list' builtin to be registered");
    };
    let Some(tuple_class) = evaluator.builtin_class("tuple") else {
        return report(evaluator, range, "NamedTuple() requires the 'tuple' builtin to be registered");
    };

    let source_id = evaluator.next_class_id();
    match tyeval_types::synthesize_named_tuple(
        &name,
        &fields,
        source_id,
        object_class,
        str_class,
        int_class,
        list_class,
        tuple_class,
    ) {
        Ok(class) => Type::Class(class),
        Err(e) => report(evaluator, range, e.0),
    }
}

fn classify_named_tuple_fields(evaluator: &mut Evaluator<'_>, fields_node: NodeId) -> NamedTupleFields {
    if let Some(s) = literal_str(evaluator, fields_node) {
        return NamedTupleFields::Untyped(s);
    }
    let items = match &evaluator.arena.get(fields_node).kind {
        ExprKind::List(items) | ExprKind::Tuple(items) => items.clone(),
        _ => return NamedTupleFields::Dynamic,
    };
    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        let ExprKind::Tuple(pair) = &evaluator.arena.get(item).kind else {
            return NamedTupleFields::Dynamic;
        };
        let [name_node, type_node] = pair.as_slice() else {
            return NamedTupleFields::Dynamic;
        };
        let name = literal_str(evaluator, *name_node);
        let ty = eval_type_annotation(evaluator, *type_node);
        pairs.push((name, ty));
    }
    NamedTupleFields::Typed(pairs)
}
