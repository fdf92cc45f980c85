//! C4: `validateCall` / `validateFunctionArguments` (PEP 3102) /
//! `validateConstructorArguments` (§4.3).

use std::sync::Arc;

use tyeval_ast::{ArgumentCategory, NodeId};
use tyeval_common::config::EvaluatorConfig;
use tyeval_common::diagnostics::{add_configurable_diagnostic, DiagnosticSink};
use tyeval_common::span::TextRange;
use tyeval_scope::Scope;
use tyeval_types::bind::{
    bind_function_to_class_or_object, look_up_class_member, look_up_class_member_with_flags,
};
use tyeval_types::function::ParamCategory;
use tyeval_types::{can_assign_type, combine_types, specialize_type, ClassType, FunctionType, Type, TypeVarMap};

use crate::cache::with_silenced_diagnostics;

/// One already-type-evaluated call argument (§3: `FunctionArgument`).
#[derive(Clone, Debug)]
pub struct CallArgument {
    pub value: Option<NodeId>,
    pub category: ArgumentCategory,
    pub name: Option<String>,
    pub r#type: Type,
    pub range: TextRange,
}

/// §4.3: dispatch on the callee's type.
#[allow(clippy::too_many_arguments)]
pub fn validate_call(
    error_node_range: TextRange,
    args: &[CallArgument],
    callee: &Type,
    var_map: &mut TypeVarMap,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    sink: &mut dyn DiagnosticSink,
) -> Type {
    match callee {
        Type::Unknown | Type::Any { .. } => Type::Unknown,

        Type::Function(f) => {
            validate_function_arguments(error_node_range, args, f, var_map, sink)
                .unwrap_or(Type::Unknown)
        }

        Type::OverloadedFunction(overloads) => {
            for (idx, overload) in overloads.iter().enumerate() {
                let mut attempt_map = var_map.clone();
                let result = with_silenced_diagnostics(|silent_sink| {
                    validate_function_arguments(error_node_range, args, overload, &mut attempt_map, silent_sink)
                });
                tracing::debug!(overload = idx, matched = result.is_some(), "probed overload");
                if let Some(ty) = result {
                    *var_map = attempt_map;
                    return ty;
                }
            }
            sink.error(error_node_range, "No overloads match parameters".to_string());
            Type::Unknown
        }

        Type::Class(class) => validate_constructor_arguments(
            error_node_range,
            args,
            class,
            var_map,
            scope,
            config,
            sink,
        ),

        Type::Object { class_type, .. } => {
            let Some(found) = look_up_class_member(
                class_type,
                "__call__",
                false,
                true,
            ) else {
                sink.error(
                    error_node_range,
                    format!("'{}' object is not callable", class_type.name),
                );
                return Type::Unknown;
            };
            let Type::Function(f) = found.symbol.effective_type() else {
                sink.error(
                    error_node_range,
                    format!("'{}' object is not callable", class_type.name),
                );
                return Type::Unknown;
            };
            let bound = bind_function_to_class_or_object(callee, &f);
            validate_call(
                error_node_range,
                args,
                &Type::Function(bound),
                var_map,
                scope,
                config,
                sink,
            )
        }

        Type::Union(members) => {
            let mut results = Vec::with_capacity(members.len());
            for member in members.iter() {
                if member.is_none() {
                    add_configurable_diagnostic(
                        sink,
                        config.report_optional_call,
                        error_node_range,
                        "Object of type 'None' cannot be called".to_string(),
                    );
                    continue;
                }
                results.push(validate_call(
                    error_node_range,
                    args,
                    member,
                    var_map,
                    scope,
                    config,
                    sink,
                ));
            }
            combine_types(results)
        }

        other => {
            sink.error(
                error_node_range,
                format!("'{}' object is not callable", tyeval_types::describe(other)),
            );
            Type::Unknown
        }
    }
}

struct ParamState {
    args_needed: u32,
    args_received: u32,
}

/// §4.3 steps 1–7.
pub fn validate_function_arguments(
    error_node_range: TextRange,
    args: &[CallArgument],
    function: &FunctionType,
    var_map: &mut TypeVarMap,
    sink: &mut dyn DiagnosticSink,
) -> Option<Type> {
    let params = &function.parameters;

    // Step 1: parameter map.
    let mut states: Vec<ParamState> = params
        .iter()
        .map(|p| ParamState {
            args_needed: u32::from(p.category == ParamCategory::Simple && !p.has_default),
            args_received: 0,
        })
        .collect();

    // Step 2: positionalParamCount.
    let positional_param_count = params
        .iter()
        .position(|p| p.category == ParamCategory::VarArgList && p.name.is_none())
        .or_else(|| {
            params
                .iter()
                .position(|p| p.category == ParamCategory::VarArgList && p.name.is_some())
                .map(|i| i + 1)
        })
        .or_else(|| params.iter().position(|p| p.category == ParamCategory::VarArgDictionary))
        .unwrap_or(params.len());

    // Step 3: positionalArgCount.
    let positional_arg_count = args
        .iter()
        .position(|a| a.category == ArgumentCategory::Dictionary || a.name.is_some())
        .unwrap_or(args.len());

    let mut errored = false;
    let mut arg_index = 0usize;
    let mut param_index = 0usize;

    // Step 4: positional phase.
    while arg_index < positional_arg_count {
        if param_index >= params.len() {
            sink.error(
                error_node_range,
                format!("Expected {positional_param_count} positional arguments"),
            );
            errored = true;
            break;
        }
        let param = &params[param_index];
        if param.category == ParamCategory::VarArgList {
            for arg in &args[arg_index..positional_arg_count] {
                if !can_assign_type(&param.r#type, &arg.r#type, arg.range, sink, var_map) {
                    errored = true;
                }
            }
            arg_index = positional_arg_count;
            param_index += 1;
            break;
        }

        let arg = &args[arg_index];
        if !can_assign_type(&param.r#type, &arg.r#type, arg.range, sink, var_map) {
            errored = true;
        }
        states[param_index].args_received += 1;
        arg_index += 1;
        param_index += 1;

        if param_index >= positional_param_count && arg_index < positional_arg_count {
            sink.error(
                error_node_range,
                format!("Expected {positional_param_count} positional arguments"),
            );
            errored = true;
            break;
        }
    }

    // Step 5: named phase.
    let mut found_dictionary_arg = false;
    let mut found_list_arg = args[..arg_index.min(args.len())]
        .iter()
        .any(|a| a.category == ArgumentCategory::List);
    for arg in &args[arg_index..] {
        if arg.category == ArgumentCategory::Dictionary {
            found_dictionary_arg = true;
            continue;
        }
        if arg.category == ArgumentCategory::List {
            found_list_arg = true;
            continue;
        }
        let Some(name) = &arg.name else { continue };
        let Some(found_index) = params.iter().position(|p| p.name.as_deref() == Some(name.as_str())) else {
            let has_kwargs = params.iter().any(|p| p.category == ParamCategory::VarArgDictionary);
            if !has_kwargs {
                sink.error(error_node_range, format!("No parameter named '{name}'"));
                errored = true;
            }
            continue;
        };
        if states[found_index].args_received > 0 {
            sink.error(
                error_node_range,
                format!("Parameter '{name}' is already assigned"),
            );
            errored = true;
            continue;
        }
        if !can_assign_type(&params[found_index].r#type, &arg.r#type, arg.range, sink, var_map) {
            errored = true;
        }
        states[found_index].args_received += 1;
    }

    // Step 6: completeness.
    if !found_dictionary_arg && !found_list_arg {
        for (param, state) in params.iter().zip(states.iter()) {
            if state.args_received < state.args_needed {
                if let Some(name) = &param.name {
                    sink.error(
                        error_node_range,
                        format!("Argument missing for parameter '{name}'"),
                    );
                }
                errored = true;
            }
        }
    }

    // Step 7.
    if errored {
        None
    } else {
        Some(specialize_type(&function.effective_return_type(), var_map))
    }
}

/// §4.3 `validateConstructorArguments`.
#[allow(clippy::too_many_arguments)]
pub fn validate_constructor_arguments(
    error_node_range: TextRange,
    args: &[CallArgument],
    class: &Arc<ClassType>,
    var_map: &mut TypeVarMap,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    sink: &mut dyn DiagnosticSink,
) -> Type {
    let _ = (scope, config);

    // §4.3: look up `__new__` with method-lookup flags plus
    // `SkipObjectBaseClass` so a class with no `__new__` of its own doesn't
    // resolve to `object.__new__`.
    let new_member = look_up_class_member_with_flags(class, "__new__", false, true, true);
    let init_member = look_up_class_member(class, "__init__", true, true);

    let mut new_errored = false;
    if let Some(found) = &new_member {
        if let Type::Function(f) = found.symbol.effective_type() {
            let bound = bind_function_to_class_or_object(&Type::Class(class.clone()), &f);
            if validate_function_arguments(error_node_range, args, &bound, var_map, sink).is_none() {
                new_errored = true;
            }
        }
    }

    // §4.3: "__init__ against Object(C) with its own varMap" — its own,
    // not __new__'s — is what ends up specializing the constructed object.
    let mut init_var_map = TypeVarMap::new();
    if let Some(found) = &init_member {
        if let Type::Function(f) = found.symbol.effective_type() {
            let self_type = Type::object(class.clone());
            let bound = bind_function_to_class_or_object(&self_type, &f);
            if new_errored {
                with_silenced_diagnostics(|silent_sink| {
                    validate_function_arguments(error_node_range, args, &bound, &mut init_var_map, silent_sink)
                });
            } else {
                validate_function_arguments(error_node_range, args, &bound, &mut init_var_map, sink);
            }
        }
    }

    if new_member.is_none() && init_member.is_none() {
        if !args.is_empty() {
            sink.error(error_node_range, "Expected no arguments".to_string());
        }
        return Type::object(class.clone());
    }

    Type::object(specialize_class_from_var_map(class, &init_var_map))
}

fn specialize_class_from_var_map(class: &Arc<ClassType>, var_map: &TypeVarMap) -> Arc<ClassType> {
    if class.type_params.is_empty() {
        return class.clone();
    }
    let args: Vec<Type> = class
        .type_params
        .iter()
        .map(|p| var_map.get(p).cloned().unwrap_or(Type::Any { is_ellipsis: false }))
        .collect();
    class.clone_for_specialization(args)
}
