//! `OperatorType` and `KeywordType` — the two enumerations the evaluator
//! switches on when dispatching unary/binary/boolean expressions and literal
//! keyword constants (§6: "Consumed from parser (types only)").

/// Every operator the evaluator's binary/unary dispatch needs to
/// distinguish. Augmented-assignment forms (`+=`, `|=`, ...) carry the same
/// tag as their non-augmented counterpart plus `is_augmented`; the evaluator
/// treats them identically for type computation (the binder is responsible
/// for the extra "is this a valid assignment target" check).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorType {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    MatrixMultiply,

    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,

    // Comparison
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Boolean
    And,
    Or,
    Not,

    // Identity / membership
    Is,
    IsNot,
    In,
    NotIn,

    // Unary
    Positive,
    Negative,
    Invert,
}

impl OperatorType {
    /// The magic method invoked on the left operand for a binary operator,
    /// per §4.4 ("Binary arithmetic ... fall back to the magic method on the
    /// left"). Returns `None` for operators that never dispatch through a
    /// dunder (boolean `and`/`or`, identity, membership).
    #[must_use]
    pub const fn dunder_name(self) -> Option<&'static str> {
        use OperatorType::{
            Add, BitwiseAnd, BitwiseOr, BitwiseXor, Divide, Equals, FloorDivide,
            GreaterThan, GreaterThanOrEqual, Invert, LeftShift, LessThan, LessThanOrEqual,
            MatrixMultiply, Modulo, Multiply, Negative, NotEquals, Positive, Power, RightShift,
            Subtract,
        };
        Some(match self {
            Add => "__add__",
            Subtract => "__sub__",
            Multiply => "__mul__",
            Divide => "__truediv__",
            FloorDivide => "__floordiv__",
            Modulo => "__mod__",
            Power => "__pow__",
            MatrixMultiply => "__matmul__",
            BitwiseAnd => "__and__",
            BitwiseOr => "__or__",
            BitwiseXor => "__xor__",
            LeftShift => "__lshift__",
            RightShift => "__rshift__",
            Equals => "__eq__",
            NotEquals => "__ne__",
            LessThan => "__lt__",
            LessThanOrEqual => "__le__",
            GreaterThan => "__gt__",
            GreaterThanOrEqual => "__ge__",
            Positive => "__pos__",
            Negative => "__neg__",
            // §9: the source maps unary invert to `__inv__`, not the
            // language's actual dunder `__invert__`. That inconsistency is
            // preserved intentionally here; see `dispatch::unary`.
            Invert => "__inv__",
            _ => return None,
        })
    }

    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            OperatorType::Equals
                | OperatorType::NotEquals
                | OperatorType::LessThan
                | OperatorType::LessThanOrEqual
                | OperatorType::GreaterThan
                | OperatorType::GreaterThanOrEqual
        )
    }

    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            OperatorType::Add
                | OperatorType::Subtract
                | OperatorType::Multiply
                | OperatorType::Divide
                | OperatorType::FloorDivide
                | OperatorType::Modulo
                | OperatorType::Power
                | OperatorType::MatrixMultiply
        )
    }

    #[must_use]
    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            OperatorType::BitwiseAnd
                | OperatorType::BitwiseOr
                | OperatorType::BitwiseXor
                | OperatorType::LeftShift
                | OperatorType::RightShift
        )
    }
}

/// Keyword-constant literals (§6). `Debug` is the target language's `__debug__`
/// builtin constant; it behaves like any other `bool`-typed name for the
/// evaluator's purposes but is tokenized as a keyword rather than an
/// identifier, so the parser hands it over as a distinct variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordType {
    True,
    False,
    None,
    Debug,
}
