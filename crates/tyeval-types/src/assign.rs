//! §4.1: `canAssignType` / `canAssignToTypeVar` and `specializeType`.

use indexmap::IndexMap;
use tyeval_common::diagnostics::DiagnosticSink;
use tyeval_common::span::TextRange;

use crate::class::{is_same_generic_class, ClassType};
use crate::combine::do_for_subtypes;
use crate::function::{FunctionType, ParamCategory};
use crate::ty::Type;
use crate::typevar::{TypeVarDetails, Variance};
use std::sync::Arc;

/// Ordered substitution from `TypeVar` identity to the type it was bound to
/// during assignability checking (§3). Keyed by `TypeVarDetails::id` rather
/// than by the `Arc` itself so that distinct `Arc` clones of the same type
/// variable share one slot.
#[derive(Clone, Debug, Default)]
pub struct TypeVarMap {
    bindings: IndexMap<u32, Type>,
}

impl TypeVarMap {
    #[must_use]
    pub fn new() -> Self {
        TypeVarMap {
            bindings: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, var: &TypeVarDetails) -> Option<&Type> {
        self.bindings.get(&var.id)
    }

    pub fn set(&mut self, var: &TypeVarDetails, ty: Type) {
        self.bindings.insert(var.id, ty);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Report a type-mismatch diagnostic at `range` and return `false`; callers
/// chain this as the tail expression of every failing arm so the "record a
/// diagnostic, then fail" pattern reads as a single branch rather than two
/// statements repeated at every call site.
fn mismatch(
    sink: &mut dyn DiagnosticSink,
    range: TextRange,
    dst: &Type,
    src: &Type,
) -> bool {
    sink.error(
        range,
        format!(
            "Argument of type '{}' cannot be assigned to parameter of type '{}'",
            describe(src),
            describe(dst)
        ),
    );
    false
}

/// Minimal human-readable rendering used only in diagnostic text; not a
/// stable serialization format.
#[must_use]
pub fn describe(t: &Type) -> String {
    match t {
        Type::Unknown => "Unknown".to_string(),
        Type::Any { is_ellipsis: true } => "...".to_string(),
        Type::Any { is_ellipsis: false } => "Any".to_string(),
        Type::None => "None".to_string(),
        Type::Never => "Never".to_string(),
        Type::Class(c) => format!("type[{}]", c.name),
        Type::Object { class_type, .. } => class_type.name.clone(),
        Type::Function(f) => format!("({}) -> ...", f.name),
        Type::OverloadedFunction(_) => "overloaded function".to_string(),
        Type::Module(m) => format!("module {}", m.name),
        Type::Union(members) => members
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join(" | "),
        Type::TypeVar(v) => v.name.clone(),
        Type::Property(_) => "property".to_string(),
    }
}

/// §4.1 rule 1–6. `range` is used only for the diagnostic text emitted on
/// failure; callers that don't want diagnostics pass a `NullDiagnosticSink`
/// (e.g. overload probing, §5).
pub fn can_assign_type(
    dst: &Type,
    src: &Type,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
    var_map: &mut TypeVarMap,
) -> bool {
    // Rule 1: Unknown/Any absorb on either side without diagnostics.
    if dst.is_any_or_unknown() || src.is_any_or_unknown() {
        return true;
    }

    // Rule 2: Never is assignable to anything; only Never assigns to Never.
    if src.is_never() {
        return true;
    }
    if dst.is_never() {
        return false;
    }

    // Rule 3: Union on source — every branch must be assignable.
    if let Type::Union(src_members) = src {
        return src_members
            .iter()
            .all(|s| can_assign_type(dst, s, range, sink, var_map));
    }
    // Union on destination — some branch must accept the source.
    if let Type::Union(dst_members) = dst {
        return dst_members
            .iter()
            .any(|d| can_assign_type(d, src, range, &mut tyeval_common::diagnostics::NullDiagnosticSink, var_map));
    }

    // Rule 5: TypeVar on destination.
    if let Type::TypeVar(var) = dst {
        return can_assign_to_type_var(var, src, range, sink, var_map);
    }

    match (dst, src) {
        (Type::None, Type::None) => true,

        (Type::Class(d), Type::Class(s)) => {
            is_same_generic_class(d, s) || is_subclass(s, d)
        }

        (
            Type::Object {
                class_type: d_class,
                ..
            },
            Type::Object {
                class_type: s_class,
                ..
            },
        ) => can_assign_class(s_class, d_class),

        (Type::Function(d), Type::Function(s)) => {
            can_assign_function(d, s, range, sink, var_map)
        }

        (Type::Function(_), Type::OverloadedFunction(overloads)) => overloads
            .iter()
            .any(|o| can_assign_type(dst, &Type::Function(Arc::new(o.clone())), range, &mut tyeval_common::diagnostics::NullDiagnosticSink, var_map)),

        (Type::Module(d), Type::Module(s)) => d.name == s.name,

        (Type::Property(_), Type::Property(_)) => true,

        (Type::OverloadedFunction(d), Type::OverloadedFunction(s)) => {
            d.len() == s.len()
                && d.iter().zip(s.iter()).all(|(do_, so)| {
                    can_assign_function(do_, so, range, &mut tyeval_common::diagnostics::NullDiagnosticSink, var_map)
                })
        }

        _ => mismatch(sink, range, dst, src),
    }
}

/// Rule 4: `Object(C)` assignable to `Object(D)` iff `D` is `C` or a
/// transitive base of `C` along edges marked `include_in_mro`. Variance of
/// `D`'s own type parameters against `C`'s corresponding arguments is
/// checked once a matching base is found.
fn can_assign_class(c: &Arc<ClassType>, d: &Arc<ClassType>) -> bool {
    if is_same_generic_class(c, d) {
        return type_args_compatible(c, d);
    }
    for (base, include_in_mro) in c.base_classes().iter() {
        if *include_in_mro && can_assign_class(base, d) {
            return true;
        }
    }
    false
}

fn is_subclass(s: &Arc<ClassType>, d: &Arc<ClassType>) -> bool {
    can_assign_class(s, d)
}

fn type_args_compatible(c: &Arc<ClassType>, d: &Arc<ClassType>) -> bool {
    if c.type_args.is_empty() || d.type_args.is_empty() {
        return true;
    }
    c.type_args
        .iter()
        .zip(d.type_args.iter())
        .zip(d.type_params.iter())
        .all(|((c_arg, d_arg), param)| match param.variance {
            Variance::Invariant => types_structurally_equal(c_arg, d_arg),
            Variance::Covariant => {
                let mut vm = TypeVarMap::new();
                can_assign_type(
                    d_arg,
                    c_arg,
                    TextRange::default(),
                    &mut tyeval_common::diagnostics::NullDiagnosticSink,
                    &mut vm,
                )
            }
            Variance::Contravariant => {
                let mut vm = TypeVarMap::new();
                can_assign_type(
                    c_arg,
                    d_arg,
                    TextRange::default(),
                    &mut tyeval_common::diagnostics::NullDiagnosticSink,
                    &mut vm,
                )
            }
        })
}

fn types_structurally_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Class(x), Type::Class(y)) => is_same_generic_class(x, y),
        (Type::Object { class_type: x, .. }, Type::Object { class_type: y, .. }) => {
            is_same_generic_class(x, y)
        }
        (Type::Unknown, Type::Unknown)
        | (Type::None, Type::None)
        | (Type::Never, Type::Never) => true,
        (Type::Any { is_ellipsis: e1 }, Type::Any { is_ellipsis: e2 }) => e1 == e2,
        (Type::TypeVar(x), Type::TypeVar(y)) => x == y,
        _ => false,
    }
}

/// Rule 6: contravariant parameters by position, covariant return.
fn can_assign_function(
    dst: &FunctionType,
    src: &FunctionType,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
    var_map: &mut TypeVarMap,
) -> bool {
    if dst.parameters.len() > src.parameters.len() {
        return mismatch(
            sink,
            range,
            &Type::Function(Arc::new(dst.clone())),
            &Type::Function(Arc::new(src.clone())),
        );
    }
    for (d_param, s_param) in dst.parameters.iter().zip(src.parameters.iter()) {
        if d_param.category != s_param.category {
            return false;
        }
        // Contravariant: the source parameter type must accept the
        // destination's, not the other way around.
        if !can_assign_type(&s_param.r#type, &d_param.r#type, range, sink, var_map) {
            return false;
        }
    }
    can_assign_type(
        &dst.effective_return_type(),
        &src.effective_return_type(),
        range,
        sink,
        var_map,
    )
}

/// Rule 5: if `var` is already bound in `var_map`, the new candidate must be
/// assignable to (or from, for an already-resolved invariant slot) the
/// existing binding; otherwise record it, subject to `bound`/`constraints`.
fn can_assign_to_type_var(
    var: &Arc<TypeVarDetails>,
    src: &Type,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
    var_map: &mut TypeVarMap,
) -> bool {
    if let Some(bound_ty) = var_map.get(var).cloned() {
        return can_assign_type(&bound_ty, src, range, sink, var_map);
    }

    if let Some(bound) = &var.bound {
        if !can_assign_type(bound, src, range, &mut tyeval_common::diagnostics::NullDiagnosticSink, &mut TypeVarMap::new()) {
            sink.error(
                range,
                format!(
                    "Type '{}' is not compatible with bound '{}' for type variable '{}'",
                    describe(src),
                    describe(bound),
                    var.name
                ),
            );
            return false;
        }
    } else if !var.constraints.is_empty() {
        let satisfies_any = var.constraints.iter().any(|c| {
            can_assign_type(c, src, range, &mut tyeval_common::diagnostics::NullDiagnosticSink, &mut TypeVarMap::new())
        });
        if !satisfies_any {
            sink.error(
                range,
                format!(
                    "Type '{}' does not satisfy any constraint of type variable '{}'",
                    describe(src),
                    var.name
                ),
            );
            return false;
        }
    }

    var_map.set(var, src.clone());
    true
}

/// §4.3/§4.5: substitute every `TypeVar` in `t` per `var_map`; leaves
/// unbound type variables untouched (they surface as themselves rather than
/// being coerced to `Unknown`, matching the source's "apply substitution"
/// wording rather than a "resolve-or-default" one).
#[must_use]
pub fn specialize_type(t: &Type, var_map: &TypeVarMap) -> Type {
    match t {
        Type::TypeVar(var) => var_map.get(var).cloned().unwrap_or_else(|| t.clone()),
        Type::Union(_) => do_for_subtypes(t, |s| specialize_type(s, var_map)),
        Type::Class(c) if c.is_specialized() => {
            let new_args: Vec<Type> = c.type_args.iter().map(|a| specialize_type(a, var_map)).collect();
            Type::Class(c.clone_for_specialization(new_args))
        }
        Type::Object { class_type, truthy } if class_type.is_specialized() => {
            let new_args: Vec<Type> = class_type
                .type_args
                .iter()
                .map(|a| specialize_type(a, var_map))
                .collect();
            Type::Object {
                class_type: class_type.clone_for_specialization(new_args),
                truthy: *truthy,
            }
        }
        Type::Function(f) => {
            let specialized = FunctionType {
                name: f.name.clone(),
                flags: f.flags,
                parameters: f
                    .parameters
                    .iter()
                    .map(|p| crate::function::Param {
                        category: p.category,
                        name: p.name.clone(),
                        has_default: p.has_default,
                        default_type: p.default_type.as_ref().map(|d| specialize_type(d, var_map)),
                        r#type: specialize_type(&p.r#type, var_map),
                    })
                    .collect(),
                declared_return_type: f
                    .declared_return_type
                    .as_ref()
                    .map(|r| specialize_type(r, var_map)),
                inferred_return_type: f
                    .inferred_return_type
                    .as_ref()
                    .map(|r| specialize_type(r, var_map)),
                built_in_name: f.built_in_name.clone(),
            };
            Type::Function(Arc::new(specialized))
        }
        other => other.clone(),
    }
}

#[must_use]
pub fn param_category_matches(category: ParamCategory, other: ParamCategory) -> bool {
    category == other
}
