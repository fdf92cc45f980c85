//! Common types and utilities shared by the tyeval crates.
//!
//! This crate provides the foundational pieces that `tyeval-ast`,
//! `tyeval-scope`, `tyeval-types`, and `tyeval-checker` all need without
//! depending on each other:
//! - source spans (`TextRange`)
//! - diagnostics (`Diagnostic`, `DiagnosticSink`, configurable levels)
//! - recursion limits
//! - evaluator configuration

pub mod config;
pub mod diagnostics;
pub mod limits;
pub mod span;

pub use config::EvaluatorConfig;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticLevel, DiagnosticSink, NullDiagnosticSink,
    VecDiagnosticSink, add_configurable_diagnostic,
};
pub use span::TextRange;
