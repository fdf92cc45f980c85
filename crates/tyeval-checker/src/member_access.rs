//! C3: `getMember` — member/attribute resolution over classes, objects,
//! modules, and unions, with descriptor and `__getattr__` fallback (§4.2).

use std::sync::Arc;

use tyeval_common::config::EvaluatorConfig;
use tyeval_common::diagnostics::{add_configurable_diagnostic, DiagnosticSink};
use tyeval_common::span::TextRange;
use tyeval_scope::Scope;
use tyeval_types::bind::{bind_function_to_class_or_object, look_up_class_member, MemberAccessFlags};
use tyeval_types::{describe, ClassType, Type};

/// What the access is for — governs both which dunder fallback is tried
/// and which word appears in the failure diagnostic (§4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberUsage {
    Get,
    Set,
    Delete,
}

impl MemberUsage {
    fn verb(self) -> &'static str {
        match self {
            MemberUsage::Get => "access",
            MemberUsage::Set => "set",
            MemberUsage::Delete => "delete",
        }
    }

    /// The attribute-protocol fallback dunder for this usage. `Delete`
    /// intentionally looks up `__detattr__`, not `__delattr__` — an
    /// observed bug in the source being preserved rather than fixed (§9).
    fn fallback_dunder(self) -> &'static str {
        match self {
            MemberUsage::Get => "__getattr__",
            MemberUsage::Set => "__setattr__",
            MemberUsage::Delete => "__detattr__",
        }
    }
}

/// §4.2's flag set `SkipForMethodLookup`, re-exported here under the name
/// the rest of this crate's call sites use it by.
#[must_use]
pub fn skip_for_method_lookup() -> MemberAccessFlags {
    MemberAccessFlags::for_method_lookup()
}

/// Resolve `base.name` (or the set/delete equivalent) per §4.2.
#[allow(clippy::too_many_arguments)]
pub fn get_member(
    base: &Type,
    name: &str,
    usage: MemberUsage,
    flags: MemberAccessFlags,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
) -> Type {
    match base {
        Type::Unknown | Type::Any { .. } => base.clone(),

        Type::Class(class) => get_member_on_class_or_object(
            base,
            class,
            name,
            usage,
            flags | MemberAccessFlags::SKIP_INSTANCE_MEMBERS,
            scope,
            config,
            range,
            sink,
        ),

        Type::Object { class_type, .. } => get_member_on_class_or_object(
            base, class_type, name, usage, flags, scope, config, range, sink,
        ),

        Type::Module(module) => module.members.get(name).map_or_else(
            || {
                sink.error(
                    range,
                    format!(
                        "Cannot {} member '{}' for type 'module {}'",
                        usage.verb(),
                        name,
                        module.name
                    ),
                );
                Type::Unknown
            },
            |symbol| symbol.effective_type(),
        ),

        Type::Union(members) => get_member_from_union(
            members, name, usage, flags, scope, config, range, sink,
        ),

        Type::Property(property) => match usage {
            MemberUsage::Get => property.getter.effective_return_type(),
            MemberUsage::Set => {
                if property.setter.is_some() {
                    Type::any()
                } else {
                    Type::Unknown
                }
            }
            MemberUsage::Delete => {
                if property.deleter.is_some() {
                    Type::any()
                } else {
                    Type::Unknown
                }
            }
        },

        other => {
            sink.error(
                range,
                format!(
                    "Cannot {} member '{}' for type '{}'",
                    usage.verb(),
                    name,
                    describe(other)
                ),
            );
            Type::Unknown
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn get_member_on_class_or_object(
    base: &Type,
    class: &Arc<ClassType>,
    name: &str,
    usage: MemberUsage,
    flags: MemberAccessFlags,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
) -> Type {
    let include_instance = !flags.contains(MemberAccessFlags::SKIP_INSTANCE_MEMBERS);
    if let Some(found) = look_up_class_member(class, name, include_instance, true) {
        let resolved_type = found.symbol.effective_type();
        if !flags.contains(MemberAccessFlags::SKIP_GET_CHECK) {
            if let Some(descriptor_result) =
                apply_descriptor_protocol(&resolved_type, usage, scope, config, range, sink)
            {
                return descriptor_result;
            }
        }
        if let Type::Function(f) = &resolved_type {
            return Type::Function(bind_function_to_class_or_object(base, f));
        }
        return resolved_type;
    }

    if !flags.contains(MemberAccessFlags::SKIP_GET_ATTRIBUTE_CHECK) {
        if let Some(ty) = try_attribute_fallback(class, usage, base) {
            return ty;
        }
    }

    sink.error(
        range,
        format!(
            "Cannot {} member '{}' for type '{}'",
            usage.verb(),
            name,
            describe(base)
        ),
    );
    Type::Unknown
}

/// §4.2: "if the resolved member is an Object whose class defines
/// `__get__`/`__set__`/`__del__`, the return of that method is substituted
/// (for `__get__`) or Any is returned (for `__set__`/`__del__`)."
fn apply_descriptor_protocol(
    member: &Type,
    usage: MemberUsage,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
) -> Option<Type> {
    let Type::Object { class_type, .. } = member else {
        return None;
    };
    let dunder = match usage {
        MemberUsage::Get => "__get__",
        MemberUsage::Set => "__set__",
        MemberUsage::Delete => "__del__",
    };
    let found = look_up_class_member(class_type, dunder, false, true)?;
    match usage {
        MemberUsage::Get => {
            let Type::Function(f) = found.symbol.effective_type() else {
                return Some(Type::any());
            };
            let _ = (scope, config, range, sink);
            Some(f.effective_return_type())
        }
        MemberUsage::Set | MemberUsage::Delete => Some(Type::any()),
    }
}

fn try_attribute_fallback(class: &Arc<ClassType>, usage: MemberUsage, base: &Type) -> Option<Type> {
    // §4.2: `__getattribute__` is only tried for a `Get` usage — there is no
    // `__setattribute__`/`__delattribute__` equivalent in the target
    // language, only the per-usage dunders handled below.
    if usage == MemberUsage::Get {
        if let Some(found) = look_up_class_member(class, "__getattribute__", false, true) {
            if let Type::Function(f) = found.symbol.effective_type() {
                return Some(bind_function_to_class_or_object(base, &f).effective_return_type());
            }
        }
    }
    let found = look_up_class_member(class, usage.fallback_dunder(), false, true)?;
    if let Type::Function(f) = found.symbol.effective_type() {
        return Some(bind_function_to_class_or_object(base, &f).effective_return_type());
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn get_member_from_union(
    members: &[Type],
    name: &str,
    usage: MemberUsage,
    flags: MemberAccessFlags,
    scope: &dyn Scope,
    config: &EvaluatorConfig,
    range: TextRange,
    sink: &mut dyn DiagnosticSink,
) -> Type {
    let mut reported_optional = false;
    let mut results = Vec::with_capacity(members.len());
    for member in members {
        if member.is_none() {
            if !reported_optional {
                add_configurable_diagnostic(
                    sink,
                    config.report_optional_member_access,
                    range,
                    format!("'{name}' is not a known member of 'None'"),
                );
                reported_optional = true;
            }
            continue;
        }
        results.push(get_member(
            member, name, usage, flags, scope, config, range, sink,
        ));
    }
    tyeval_types::combine_types(results)
}
