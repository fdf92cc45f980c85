//! Expression parse-tree nodes (§6: "Consumed from parser (types only)").
//!
//! The real tokenizer/parser is an external collaborator; this module only
//! carries the shapes the evaluator pattern-matches on. Nodes live in an
//! [`Arena`] and refer to each other by [`NodeId`] rather than by owned
//! pointer, mirroring how the checker's own recursive calls index into a
//! shared node table instead of walking a boxed tree.

use tyeval_common::TextRange;

use crate::operator::{KeywordType, OperatorType};

/// Index of a node within an [`Arena`]. Cheap to copy, cheap to hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Which side of a call argument list an argument occupies (§3:
/// `FunctionArgument.category`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentCategory {
    /// A plain positional-or-keyword argument.
    Simple,
    /// `*expr` — unpacked into the positional region.
    List,
    /// `**expr` — unpacked into the keyword region.
    Dictionary,
}

/// One entry of a call's argument list, before type evaluation.
#[derive(Clone, Debug)]
pub struct Argument {
    /// The argument's value expression. `None` only for a bare `*` marker
    /// used to force keyword-only parameters in a `def`'s parameter list;
    /// call-site arguments always carry a value.
    pub value: Option<NodeId>,
    pub category: ArgumentCategory,
    /// Present when the argument was passed as `name=value`.
    pub name: Option<String>,
}

/// Category of a literal constant (§4.4, "Literal constants").
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantKind {
    Keyword(KeywordType),
    Number,
    /// A string literal. `type_comment`, when present, is the node of a
    /// parsed `# type: ...` comment annotation attached to this literal
    /// (§4.4: "string literal with a type-comment annotation is dispatched
    /// to its annotation"). `value` carries the decoded contents when the
    /// literal is a plain, non-concatenated, non-f-string (the only shape
    /// the special-form synthesizer ever needs to read through, e.g.
    /// `TypeVar("T")`'s name or `NamedTuple`'s whitespace-separated field
    /// list) — `None` for anything the parser can't reduce to a single
    /// static string.
    Str {
        type_comment: Option<NodeId>,
        value: Option<String>,
    },
    Bytes,
    Ellipsis,
}

/// One parameter of a `lambda` expression.
#[derive(Clone, Debug)]
pub struct LambdaParam {
    pub name: String,
    pub category: ArgumentCategory,
    pub default: Option<NodeId>,
}

/// The shape of a comprehension clause, carried only so the stubbed
/// comprehension evaluator (§9: "the list-comprehension expression returns
/// Unknown") can still distinguish list/set/dict/generator comprehensions
/// for diagnostics that mention the right container name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

/// The tag-dispatched node kind (§4.4 enumerates the per-kind policy this
/// mirrors one-to-one).
#[derive(Clone, Debug)]
pub enum ExprKind {
    Name {
        name: String,
    },
    MemberAccess {
        base: NodeId,
        member: String,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
    Call {
        callee: NodeId,
        args: Vec<Argument>,
    },
    Tuple(Vec<NodeId>),
    List(Vec<NodeId>),
    Set(Vec<NodeId>),
    Dict(Vec<(NodeId, NodeId)>),
    UnaryOp {
        op: OperatorType,
        operand: NodeId,
    },
    BinaryOp {
        op: OperatorType,
        left: NodeId,
        right: NodeId,
    },
    Ternary {
        test: NodeId,
        if_true: NodeId,
        if_false: NodeId,
    },
    Await {
        value: NodeId,
    },
    Yield {
        value: Option<NodeId>,
    },
    YieldFrom {
        value: NodeId,
    },
    Lambda {
        params: Vec<LambdaParam>,
        body: NodeId,
    },
    /// Stub (§1, §9): only the iterable's element type is modeled; the
    /// comprehension's own filter/nesting structure is not evaluated.
    Comprehension {
        kind: ComprehensionKind,
        element: NodeId,
        iterable: NodeId,
    },
    /// Stub (§9): slice expressions are parsed but not given their own
    /// `slice` built-in type yet.
    Slice {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
        step: Option<NodeId>,
    },
    Assignment {
        target: NodeId,
        value: NodeId,
    },
    TypeAnnotation {
        expr: NodeId,
        annotation: NodeId,
    },
    Constant(ConstantKind),
    /// Produced by parser error recovery; the evaluator treats this like any
    /// other terminal and returns `Unknown` without emitting a duplicate
    /// diagnostic (the parser already reported the syntax error).
    Error,
}

/// A single parse-tree node: its kind, its source range, and its parent.
#[derive(Clone, Debug)]
pub struct ExpressionNode {
    pub kind: ExprKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
}

/// Owns every node produced for one file/expression tree.
///
/// Arena-allocating nodes (rather than boxing them into a recursive enum)
/// is what lets the evaluator's cache (C8) key on a small `Copy` id instead
/// of a pointer, and is why sibling cache writes are observable in
/// evaluation order (§5: "Ordering guarantees").
#[derive(Default)]
pub struct Arena {
    nodes: Vec<ExpressionNode>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    pub fn push(&mut self, kind: ExprKind, range: TextRange, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ExpressionNode {
            kind,
            range,
            parent,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &ExpressionNode {
        &self.nodes[id.0 as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
