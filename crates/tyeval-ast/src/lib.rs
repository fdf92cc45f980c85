//! Parse-tree types consumed by the evaluator.
//!
//! The tokenizer and parser themselves are external collaborators (§1); this
//! crate only defines the node shapes and operator/keyword tags they would
//! hand the evaluator.

pub mod node;
pub mod operator;

pub use node::{
    Argument, ArgumentCategory, Arena, ComprehensionKind, ConstantKind, ExprKind, ExpressionNode,
    LambdaParam, NodeId,
};
pub use operator::{KeywordType, OperatorType};
