//! C5: the expression dispatcher — `getType`'s tag-driven recursion over
//! expression nodes (§4.4) — plus the `Evaluator` that ties the cache
//! (C8), member resolver (C3), call matcher (C4), special-form synthesizer
//! (C6), and narrowing glue (C7) together behind the one public entry
//! point §2 describes: "a public entry `getType(node, usage, flags)`
//! consults the cache, dispatches on node kind, recursively evaluates
//! sub-expressions, applies C3/C4/C6 as needed, pipes the result through
//! narrowing, writes to the cache, and returns."

use std::sync::Arc;

use tyeval_ast::{
    Arena, Argument, ComprehensionKind, ConstantKind, ExprKind, KeywordType, LambdaParam, NodeId,
    OperatorType,
};
use tyeval_common::config::EvaluatorConfig;
use tyeval_common::diagnostics::{add_configurable_diagnostic, DiagnosticSink};
use tyeval_common::limits::MAX_EXPR_EVAL_DEPTH;
use tyeval_common::span::TextRange;
use tyeval_scope::{Constraint, ExpressionAnnotations, NarrowingBuilder, NoAnnotations, Scope};
use tyeval_types::{
    bind_function_to_class_or_object, combine_types, describe, do_for_subtypes,
    look_up_class_member, remove_falsiness_from_type, remove_truthiness_from_type, ClassId,
    ClassType, FunctionFlags, FunctionType, Param, ParamCategory, Type, TypeVarMap,
};

use crate::cache::TypeCache;
use crate::call_matcher::{validate_call, CallArgument};
use crate::flags::{GetTypeFlags, TypeUsage};
use crate::member_access::{get_member, MemberUsage};
use crate::narrowing::{apply_narrowing, ConstraintStack};
use crate::special_forms_dispatch as sfd;

/// Everything `getType` is parameterized by (§9: "The evaluator is
/// parameterized by scope, configuration, execution environment,
/// diagnostic sink, and cache callbacks"), bundled into one value a
/// caller constructs once per expression tree / scope under analysis
/// (§5: "instantiate one evaluator per scope under analysis").
pub struct Evaluator<'a> {
    pub(crate) arena: &'a Arena,
    pub(crate) scope: &'a dyn Scope,
    pub(crate) config: &'a EvaluatorConfig,
    pub(crate) cache: &'a mut dyn TypeCache,
    pub(crate) sink: &'a mut dyn DiagnosticSink,
    narrowing_builder: Option<&'a dyn NarrowingBuilder>,
    annotations: &'a dyn ExpressionAnnotations,
    constraints: ConstraintStack,
    depth: u32,
    type_var_seq: u32,
    class_id_seq: u32,
}

static NO_ANNOTATIONS: NoAnnotations = NoAnnotations;

impl<'a> Evaluator<'a> {
    pub fn new(
        arena: &'a Arena,
        scope: &'a dyn Scope,
        config: &'a EvaluatorConfig,
        cache: &'a mut dyn TypeCache,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Evaluator {
            arena,
            scope,
            config,
            cache,
            sink,
            narrowing_builder: None,
            annotations: &NO_ANNOTATIONS,
            constraints: ConstraintStack::new(),
            depth: 0,
            type_var_seq: 0,
            class_id_seq: 0,
        }
    }

    #[must_use]
    pub fn with_narrowing_builder(mut self, builder: &'a dyn NarrowingBuilder) -> Self {
        self.narrowing_builder = Some(builder);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: &'a dyn ExpressionAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub(crate) fn next_type_var_id(&mut self) -> u32 {
        self.type_var_seq += 1;
        self.type_var_seq
    }

    pub(crate) fn next_class_id(&mut self) -> ClassId {
        self.class_id_seq += 1;
        ClassId(self.class_id_seq)
    }

    pub(crate) fn builtin_class(&self, name: &str) -> Option<Arc<ClassType>> {
        tyeval_scope::get_builtin_type(self.scope, name)
            .as_ref()
            .and_then(Type::as_class)
            .cloned()
    }

    fn builtin_object(&self, name: &str) -> Option<Type> {
        tyeval_scope::get_builtin_object(self.scope, name, None)
    }

    fn bool_object(&self, truthy: Option<bool>) -> Type {
        match self.builtin_class("bool") {
            Some(class_type) => Type::Object { class_type, truthy },
            None => Type::Unknown,
        }
    }

    fn bool_type(&self) -> Type {
        self.bool_object(None)
    }

    /// §4.4-internal convenience: read a sub-expression's type with no
    /// special usage or flags. Most recursive calls in the dispatcher are
    /// exactly this; the handful that aren't (annotation contexts,
    /// assignment targets) call [`Evaluator::get_type`] directly.
    fn read(&mut self, node: NodeId) -> Type {
        self.get_type(node, TypeUsage::Read, GetTypeFlags::empty())
    }

    /// The public entry (§2): `getType(node, usage, flags)`.
    pub fn get_type(&mut self, node: NodeId, usage: TypeUsage, flags: GetTypeFlags) -> Type {
        if let Some(cached) = self.cache.get(node) {
            tracing::trace!(node_id = node.0, "get_type cache hit");
            return cached;
        }

        let range = self.arena.get(node).range;
        if self.depth >= MAX_EXPR_EVAL_DEPTH {
            tracing::debug!(node_id = node.0, depth = self.depth, "expression depth limit hit");
            self.sink
                .error(range, "Expression nested too deeply to evaluate".to_string());
            return Type::Unknown;
        }

        self.depth += 1;
        let mut result = self.dispatch(node, usage, flags, range);
        self.depth -= 1;

        // §4.4 TypeAnnotation / §4.5: a bare `Class` reference evaluated
        // as a type annotation means the *instance* type, not `type[C]`.
        if flags.contains(GetTypeFlags::EXPECTING_TYPE) {
            if let Type::Class(c) = &result {
                result = Type::object(c.clone());
            }
        }

        if !flags.contains(GetTypeFlags::SKIP_NARROWING) {
            result = apply_narrowing(&self.constraints, self.scope, node, result);
        }

        self.cache.set(node, result.clone());
        result
    }

    fn dispatch(
        &mut self,
        node: NodeId,
        usage: TypeUsage,
        flags: GetTypeFlags,
        range: TextRange,
    ) -> Type {
        let kind = self.arena.get(node).kind.clone();
        match kind {
            ExprKind::Name { name } => self.eval_name(&name, range),
            ExprKind::MemberAccess { base, member } => {
                self.eval_member_access(base, &member, usage, range)
            }
            ExprKind::Index { base, index } => self.eval_index(base, index, range),
            ExprKind::Call { callee, args } => self.eval_call(callee, &args, range),
            ExprKind::Tuple(items) => self.eval_container("tuple", &items),
            ExprKind::List(items) => self.eval_container("list", &items),
            ExprKind::Set(items) => self.eval_container("set", &items),
            ExprKind::Dict(entries) => self.eval_dict(&entries),
            ExprKind::UnaryOp { op, operand } => self.eval_unary(op, operand, range),
            ExprKind::BinaryOp { op, left, right } => self.eval_binary(op, left, right, range),
            ExprKind::Ternary {
                test,
                if_true,
                if_false,
            } => self.eval_ternary(test, if_true, if_false),
            ExprKind::Await { value } => {
                let awaited = self.read(value);
                self.get_type_from_awaitable(&awaited, range)
            }
            ExprKind::Yield { value } => {
                if let Some(v) = value {
                    self.read(v);
                }
                self.eval_yield(node)
            }
            ExprKind::YieldFrom { value } => {
                self.read(value);
                self.eval_yield(node)
            }
            ExprKind::Lambda { params, body } => self.eval_lambda(node, &params, body),
            ExprKind::Comprehension {
                kind,
                element,
                iterable,
            } => self.eval_comprehension(kind, element, iterable),
            ExprKind::Slice { lower, upper, step } => self.eval_slice(lower, upper, step),
            ExprKind::Assignment { target, value } => self.eval_assignment(target, value),
            ExprKind::TypeAnnotation { expr, annotation } => {
                self.eval_annotation_node(expr, annotation)
            }
            ExprKind::Constant(c) => self.eval_constant(&c),
            ExprKind::Error => Type::Unknown,
        }
    }

    // -- Name ----------------------------------------------------------

    fn eval_name(&mut self, name: &str, range: TextRange) -> Type {
        match self.scope.look_up_symbol_recursive(name) {
            Some(lookup) => lookup.symbol.effective_type(),
            None => {
                self.sink.error(range, format!("\"{name}\" is not defined"));
                Type::Unknown
            }
        }
    }

    // -- Member access (C3) --------------------------------------------

    fn eval_member_access(
        &mut self,
        base: NodeId,
        member: &str,
        usage: TypeUsage,
        range: TextRange,
    ) -> Type {
        let base_type = self.read(base);
        let member_usage = match usage {
            TypeUsage::Read => MemberUsage::Get,
            TypeUsage::Write => MemberUsage::Set,
            TypeUsage::Delete => MemberUsage::Delete,
        };
        get_member(
            &base_type,
            member,
            member_usage,
            tyeval_types::MemberAccessFlags::empty(),
            self.scope,
            self.config,
            range,
            self.sink,
        )
    }

    // -- Subscription / generic specialization (C6) ---------------------

    fn eval_index(&mut self, base: NodeId, index: NodeId, range: TextRange) -> Type {
        let base_type = self.read(base);
        self.subscript(&base_type, index, range)
    }

    fn subscript(&mut self, base_type: &Type, index: NodeId, range: TextRange) -> Type {
        match base_type {
            Type::Unknown | Type::Any { .. } => base_type.clone(),

            Type::Class(class) => {
                if let Some(ty) = sfd::try_subscribe_special_form(self, class, index, range) {
                    return ty;
                }
                let type_args = self.subscript_type_args(index);
                Type::Class(class.clone_for_specialization(type_args))
            }

            Type::Union(members) => {
                let members = members.clone();
                let mut out = Vec::with_capacity(members.len());
                for member in members.iter() {
                    if member.is_none() {
                        add_configurable_diagnostic(
                            self.sink,
                            self.config.report_optional_subscript,
                            range,
                            "Object of type 'None' cannot be subscripted".to_string(),
                        );
                        continue;
                    }
                    out.push(self.subscript(member, index, range));
                }
                combine_types(out)
            }

            Type::None => {
                add_configurable_diagnostic(
                    self.sink,
                    self.config.report_optional_subscript,
                    range,
                    "Object of type 'None' cannot be subscripted".to_string(),
                );
                Type::Unknown
            }

            // §4.4: "On Object or Function, returns Unknown (stub)."
            Type::Object { .. } | Type::Function(_) => {
                self.read(index);
                Type::Unknown
            }

            other => {
                self.sink
                    .error(range, format!("'{}' is not subscriptable", describe(other)));
                Type::Unknown
            }
        }
    }

    fn subscript_type_args(&mut self, index: NodeId) -> Vec<Type> {
        match self.arena.get(index).kind.clone() {
            ExprKind::Tuple(items) => items
                .into_iter()
                .map(|n| sfd::eval_type_annotation(self, n))
                .collect(),
            _ => vec![sfd::eval_type_annotation(self, index)],
        }
    }

    // -- Call (C4) -------------------------------------------------------

    fn eval_call(&mut self, callee: NodeId, args: &[Argument], range: TextRange) -> Type {
        let callee_type = self.read(callee);

        if let Type::Function(f) = &callee_type {
            match f.built_in_name.as_deref() {
                Some("TypeVar") => return sfd::try_call_type_var(self, args, range),
                Some("NamedTuple") => return sfd::try_call_named_tuple(self, args, range),
                _ => {}
            }
        }

        let mut call_args = Vec::with_capacity(args.len());
        for arg in args {
            let Some(value_node) = arg.value else { continue };
            let arg_type = self.read(value_node);
            call_args.push(CallArgument {
                value: Some(value_node),
                category: arg.category,
                name: arg.name.clone(),
                r#type: arg_type,
                range: self.arena.get(value_node).range,
            });
        }

        let mut var_map = TypeVarMap::new();
        validate_call(
            range,
            &call_args,
            &callee_type,
            &mut var_map,
            self.scope,
            self.config,
            self.sink,
        )
    }

    // -- Containers ------------------------------------------------------

    fn eval_container(&mut self, builtin_name: &str, items: &[NodeId]) -> Type {
        let element_types: Vec<Type> = items.iter().map(|&n| self.read(n)).collect();
        let element = combine_types(element_types);
        match self.builtin_class(builtin_name) {
            Some(class) => Type::object(class.clone_for_specialization(vec![element])),
            None => Type::Unknown,
        }
    }

    /// §9, §4.4: the dictionary expression does not infer key/value types
    /// from its entries in this revision — every `dict` literal is
    /// specialized to `[Unknown, Unknown]` regardless of what it
    /// contains. Entries are still evaluated (for cache population and
    /// any diagnostics their own subexpressions raise), just discarded.
    fn eval_dict(&mut self, entries: &[(NodeId, NodeId)]) -> Type {
        for (k, v) in entries {
            self.read(*k);
            self.read(*v);
        }
        match self.builtin_class("dict") {
            Some(class) => {
                Type::object(class.clone_for_specialization(vec![Type::Unknown, Type::Unknown]))
            }
            None => Type::Unknown,
        }
    }

    // -- Unary / binary operators -----------------------------------------

    fn eval_unary(&mut self, op: OperatorType, operand: NodeId, range: TextRange) -> Type {
        let operand_type = self.read(operand);
        if op == OperatorType::Not {
            return self.bool_type();
        }
        let Some(dunder) = op.dunder_name() else {
            self.sink.error(range, "Operator not supported".to_string());
            return Type::Unknown;
        };
        do_for_subtypes(&operand_type, |sub| {
            self.dunder_return_type(dunder, sub, range)
        })
    }

    fn eval_binary(&mut self, op: OperatorType, left: NodeId, right: NodeId, range: TextRange) -> Type {
        match op {
            OperatorType::And => {
                let left_ty = self.read(left);
                let kept = remove_truthiness_from_type(&left_ty);
                let (if_constraints, _) = self.build_conditional(left);
                let pushed = self.constraints.push_all(&if_constraints);
                let right_ty = self.read(right);
                self.constraints.pop(pushed);
                return combine_types([kept, right_ty]);
            }
            OperatorType::Or => {
                let left_ty = self.read(left);
                let kept = remove_falsiness_from_type(&left_ty);
                let (_, else_constraints) = self.build_conditional(left);
                let pushed = self.constraints.push_all(&else_constraints);
                let right_ty = self.read(right);
                self.constraints.pop(pushed);
                return combine_types([kept, right_ty]);
            }
            OperatorType::Is
            | OperatorType::IsNot
            | OperatorType::In
            | OperatorType::NotIn => {
                self.read(left);
                self.read(right);
                return self.bool_type();
            }
            _ => {}
        }

        let left_ty = self.read(left);
        let right_ty = self.read(right);

        if op.is_comparison() {
            let Some(dunder) = op.dunder_name() else {
                return self.bool_type();
            };
            return do_for_subtypes(&left_ty, |sub| {
                self.comparison_dunder_return_type(dunder, sub)
            });
        }

        if op.is_arithmetic() {
            if let Some(promoted) = self.try_numeric_promotion(op, &left_ty, &right_ty) {
                return promoted;
            }
            let Some(dunder) = op.dunder_name() else {
                self.sink.error(range, "Operator not supported".to_string());
                return Type::Unknown;
            };
            return do_for_subtypes(&left_ty, |sub| {
                self.dunder_return_type(dunder, sub, range)
            });
        }

        if op.is_bitwise() {
            if is_built_in_object(&left_ty, "int") && is_built_in_object(&right_ty, "int") {
                if let Some(int_obj) = self.builtin_object("int") {
                    return int_obj;
                }
            }
            let Some(dunder) = op.dunder_name() else {
                self.sink.error(range, "Operator not supported".to_string());
                return Type::Unknown;
            };
            return do_for_subtypes(&left_ty, |sub| {
                self.dunder_return_type(dunder, sub, range)
            });
        }

        Type::Unknown
    }

    /// §4.4 "Binary arithmetic": `int -> float -> complex` promotion for
    /// built-in numeric operands. Never applies to `@` (matrix multiply).
    fn try_numeric_promotion(&self, op: OperatorType, left: &Type, right: &Type) -> Option<Type> {
        if op == OperatorType::MatrixMultiply {
            return None;
        }
        let (Type::Object { class_type: lc, .. }, Type::Object { class_type: rc, .. }) =
            (left, right)
        else {
            return None;
        };
        if !lc.is_built_in() || !rc.is_built_in() {
            return None;
        }
        let result_name = match (numeric_rank(&lc.name)?, numeric_rank(&rc.name)?) {
            (a, b) if a.max(b) == 0 => "int",
            (a, b) if a.max(b) == 1 => "float",
            _ => "complex",
        };
        self.builtin_object(result_name)
    }

    fn dunder_return_type(&mut self, dunder: &str, sub: &Type, range: TextRange) -> Type {
        match sub {
            Type::Unknown | Type::Any { .. } => sub.clone(),
            Type::Object { class_type, .. } => {
                match look_up_class_member(class_type, dunder, true, true) {
                    Some(found) => match found.symbol.effective_type() {
                        Type::Function(f) => {
                            bind_function_to_class_or_object(sub, &f).effective_return_type()
                        }
                        other => other,
                    },
                    None => {
                        self.sink.error(
                            range,
                            format!("'{}' object has no attribute '{dunder}'", class_type.name),
                        );
                        Type::Unknown
                    }
                }
            }
            other => {
                self.sink.error(
                    range,
                    format!("Operator '{dunder}' is not supported for type '{}'", describe(other)),
                );
                Type::Unknown
            }
        }
    }

    /// §4.4 "Binary comparison": unlike [`Evaluator::dunder_return_type`],
    /// a missing comparison dunder silently falls back to `bool` rather
    /// than reporting an error.
    fn comparison_dunder_return_type(&mut self, dunder: &str, sub: &Type) -> Type {
        match sub {
            Type::Unknown | Type::Any { .. } => sub.clone(),
            Type::Object { class_type, .. } => {
                match look_up_class_member(class_type, dunder, true, true) {
                    Some(found) => match found.symbol.effective_type() {
                        Type::Function(f) => {
                            bind_function_to_class_or_object(sub, &f).effective_return_type()
                        }
                        _ => self.bool_type(),
                    },
                    None => self.bool_type(),
                }
            }
            _ => self.bool_type(),
        }
    }

    // -- Ternary / narrowing (C7) ----------------------------------------

    fn eval_ternary(&mut self, test: NodeId, if_true: NodeId, if_false: NodeId) -> Type {
        self.read(test);
        let (if_constraints, else_constraints) = self.build_conditional(test);

        let pushed = self.constraints.push_all(&if_constraints);
        let true_ty = self.read(if_true);
        self.constraints.pop(pushed);

        let pushed = self.constraints.push_all(&else_constraints);
        let false_ty = self.read(if_false);
        self.constraints.pop(pushed);

        combine_types([true_ty, false_ty])
    }

    fn build_conditional(
        &mut self,
        test_node: NodeId,
    ) -> (Vec<Arc<dyn Constraint>>, Vec<Arc<dyn Constraint>>) {
        let Some(builder) = self.narrowing_builder else {
            return (Vec::new(), Vec::new());
        };
        let mut eval_fn = |n: NodeId| self.read(n);
        let result = builder.build_type_constraints_for_conditional(test_node, &mut eval_fn);
        (result.if_constraints, result.else_constraints)
    }

    // -- Await / yield -----------------------------------------------------

    /// §4.4 Await; also exposed standalone (§6: "Exposed surface") so a
    /// caller handling `async for`/`async with` outside a plain `await`
    /// expression can reuse the same awaitable-unwrapping logic.
    pub fn get_type_from_awaitable(&mut self, t: &Type, range: TextRange) -> Type {
        match t {
            Type::Unknown | Type::Any { .. } => t.clone(),
            Type::Object { class_type, .. } if is_generator(class_type) => {
                class_type.type_args[2].clone()
            }
            Type::Object { .. } => self.try_await_chain(t).unwrap_or_else(|| {
                self.sink
                    .error(range, format!("'{}' is not awaitable", describe(t)));
                Type::Unknown
            }),
            Type::Union(members) => {
                let members = members.clone();
                combine_types(
                    members
                        .iter()
                        .map(|m| self.get_type_from_awaitable(m, range))
                        .collect::<Vec<_>>(),
                )
            }
            other => {
                self.sink
                    .error(range, format!("'{}' is not awaitable", describe(other)));
                Type::Unknown
            }
        }
    }

    /// §4.4: "follow `__await__` -> `__iter__` chain". Tries `__await__`
    /// first since that's the dunder the `await` keyword itself invokes;
    /// falls back to `__iter__` for plain-iterator awaitables.
    fn try_await_chain(&mut self, t: &Type) -> Option<Type> {
        let Type::Object { class_type, .. } = t else {
            return None;
        };
        let found = look_up_class_member(class_type, "__await__", true, true)
            .or_else(|| look_up_class_member(class_type, "__iter__", true, true))?;
        let Type::Function(f) = found.symbol.effective_type() else {
            return Some(Type::Unknown);
        };
        let iterator_ty = bind_function_to_class_or_object(t, &f).effective_return_type();
        if let Type::Object { class_type: ic, .. } = &iterator_ty {
            if is_generator(ic) {
                return Some(ic.type_args[2].clone());
            }
        }
        Some(Type::Unknown)
    }

    /// §6: "Exposed surface" `getTypeFromIterable`. Also backs the
    /// (stub) comprehension evaluator's element-type extraction.
    pub fn get_type_from_iterable(&mut self, t: &Type, range: TextRange) -> Type {
        match t {
            Type::Unknown | Type::Any { .. } => t.clone(),
            Type::Union(members) => {
                let members = members.clone();
                combine_types(
                    members
                        .iter()
                        .map(|m| self.get_type_from_iterable(m, range))
                        .collect::<Vec<_>>(),
                )
            }
            Type::Object { class_type, .. } => {
                if !class_type.type_args.is_empty()
                    && matches!(
                        class_type.name.as_str(),
                        "list" | "set" | "frozenset" | "tuple" | "deque"
                    )
                {
                    return class_type.type_args[0].clone();
                }
                self.iterate_via_protocol(t, class_type, range)
            }
            other => {
                self.sink
                    .error(range, format!("'{}' is not iterable", describe(other)));
                Type::Unknown
            }
        }
    }

    fn iterate_via_protocol(
        &mut self,
        base: &Type,
        class_type: &Arc<ClassType>,
        range: TextRange,
    ) -> Type {
        let Some(found) = look_up_class_member(class_type, "__iter__", true, true) else {
            self.sink
                .error(range, format!("'{}' is not iterable", describe(base)));
            return Type::Unknown;
        };
        let Type::Function(f) = found.symbol.effective_type() else {
            return Type::Unknown;
        };
        let iterator_ty = bind_function_to_class_or_object(base, &f).effective_return_type();
        let Type::Object { class_type: ic, .. } = &iterator_ty else {
            return Type::Unknown;
        };
        let Some(next_found) = look_up_class_member(ic, "__next__", true, true) else {
            return Type::Unknown;
        };
        let Type::Function(nf) = next_found.symbol.effective_type() else {
            return Type::Unknown;
        };
        bind_function_to_class_or_object(&iterator_ty, &nf).effective_return_type()
    }

    fn eval_yield(&mut self, node: NodeId) -> Type {
        self.annotations.get_expression_type(node).unwrap_or(Type::Unknown)
    }

    // -- Lambda ------------------------------------------------------------

    fn eval_lambda(&mut self, node: NodeId, params: &[LambdaParam], body: NodeId) -> Type {
        if let Some(pinned) = self.annotations.get_expression_type(node) {
            return pinned;
        }

        let mut function_params = Vec::with_capacity(params.len());
        for p in params {
            let category = match p.category {
                tyeval_ast::ArgumentCategory::Simple => ParamCategory::Simple,
                tyeval_ast::ArgumentCategory::List => ParamCategory::VarArgList,
                tyeval_ast::ArgumentCategory::Dictionary => ParamCategory::VarArgDictionary,
            };
            let default_type = p.default.map(|d| self.read(d));
            function_params.push(Param {
                category,
                name: Some(p.name.clone()),
                has_default: default_type.is_some(),
                default_type,
                r#type: Type::Unknown,
            });
        }

        let return_type = self.read(body);
        Type::Function(Arc::new(FunctionType {
            name: "<lambda>".to_string(),
            flags: FunctionFlags::empty(),
            parameters: function_params,
            declared_return_type: None,
            inferred_return_type: Some(return_type),
            built_in_name: None,
        }))
    }

    // -- Stubs (§9) ----------------------------------------------------------

    /// §9: "the list-comprehension expression returns `Unknown`" — the
    /// element and iterable subtrees are still evaluated, for their cache
    /// entries and any diagnostics they raise, but the comprehension's
    /// own type is never more than `Unknown`.
    fn eval_comprehension(
        &mut self,
        kind: ComprehensionKind,
        element: NodeId,
        iterable: NodeId,
    ) -> Type {
        let _ = kind;
        let iterable_ty = self.read(iterable);
        let range = self.arena.get(iterable).range;
        self.get_type_from_iterable(&iterable_ty, range);
        self.read(element);
        Type::Unknown
    }

    /// §9: "the slice-expression evaluator builds a `set`-specialized
    /// type as a placeholder; the correct built-in is `slice`." Retained
    /// verbatim rather than fixed.
    fn eval_slice(&mut self, lower: Option<NodeId>, upper: Option<NodeId>, step: Option<NodeId>) -> Type {
        for n in [lower, upper, step].into_iter().flatten() {
            self.read(n);
        }
        // TODO(§9): should specialize `slice`, not `set`.
        self.builtin_object("set").unwrap_or(Type::Unknown)
    }

    // -- Assignment / annotation --------------------------------------------

    fn eval_assignment(&mut self, target: NodeId, value: NodeId) -> Type {
        let value_ty = self.read(value);
        self.get_type(target, TypeUsage::Write, GetTypeFlags::empty());
        value_ty
    }

    fn eval_annotation_node(&mut self, expr: NodeId, annotation: NodeId) -> Type {
        self.read(expr);
        sfd::eval_type_annotation(self, annotation)
    }

    // -- Literal constants ---------------------------------------------------

    fn eval_constant(&mut self, c: &ConstantKind) -> Type {
        match c {
            ConstantKind::Keyword(KeywordType::None) => Type::None,
            ConstantKind::Keyword(KeywordType::True) => self.bool_object(Some(true)),
            ConstantKind::Keyword(KeywordType::False) => self.bool_object(Some(false)),
            ConstantKind::Keyword(KeywordType::Debug) => self.bool_object(None),
            ConstantKind::Number => self.builtin_object("int").unwrap_or(Type::Unknown),
            ConstantKind::Str { type_comment, .. } => match type_comment {
                Some(ann) => sfd::eval_type_annotation(self, *ann),
                None => self.builtin_object("str").unwrap_or(Type::Unknown),
            },
            ConstantKind::Bytes => self.builtin_object("bytes").unwrap_or(Type::Unknown),
            ConstantKind::Ellipsis => Type::Any { is_ellipsis: true },
        }
    }

    // -- Exposed surface (§6) ------------------------------------------------

    /// `getTypeFromDecorator`: a decorator is an ordinary expression (a
    /// name, attribute access, or call) applied to the thing it
    /// decorates; its own type is just whatever `getType` would produce,
    /// exposed under its own name because callers reach for it from a
    /// distinct call site (decorator lists) rather than the general
    /// expression walk.
    pub fn get_type_from_decorator(&mut self, node: NodeId) -> Type {
        self.read(node)
    }

    /// `getTypeFromObjectMember`: C3's `getMember`, exposed for callers
    /// that already have a `Type` in hand (e.g. a previously computed
    /// `self` type) rather than a `MemberAccess` node to dispatch from.
    #[allow(clippy::too_many_arguments)]
    pub fn get_type_from_object_member(
        &mut self,
        base: &Type,
        name: &str,
        usage: MemberUsage,
        flags: tyeval_types::MemberAccessFlags,
        range: TextRange,
    ) -> Type {
        get_member(base, name, usage, flags, self.scope, self.config, range, self.sink)
    }

    /// `synthesizeDataClassMethods`: exposed so the (out-of-scope) class
    /// checker can trigger dataclass `__new__`/`__init__` synthesis once
    /// it has walked a `@dataclass`-decorated class's suite and
    /// extracted candidate fields (§4.5).
    pub fn synthesize_data_class_methods(
        &self,
        class: &Arc<ClassType>,
        fields: &[tyeval_types::DataClassFieldDecl],
    ) -> Result<(), tyeval_types::DataClassSynthesisError> {
        tyeval_types::synthesize_dataclass_methods(class, fields, self.config)
    }
}

fn numeric_rank(name: &str) -> Option<u8> {
    match name {
        "int" => Some(0),
        "float" => Some(1),
        "complex" => Some(2),
        _ => None,
    }
}

fn is_built_in_object(t: &Type, name: &str) -> bool {
    matches!(t, Type::Object { class_type, .. } if class_type.is_built_in() && class_type.name == name)
}

fn is_generator(class_type: &Arc<ClassType>) -> bool {
    class_type.name == "Generator" && class_type.type_args.len() == 3
}
