//! Diagnostic types and the sink the evaluator reports through.
//!
//! The evaluator never owns a diagnostic collection itself; callers inject a
//! [`DiagnosticSink`] and every diagnostic-producing code path in the
//! evaluator writes through it. This is what makes the evaluator runnable in
//! a "silenced" mode for speculative overload probing (see
//! `tyeval_checker::cache::SilenceScope`): swap in a `NullDiagnosticSink` for
//! the duration of the probe and restore the real sink afterward.

use serde::Serialize;

use crate::span::TextRange;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

/// A single type-checking diagnostic.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    pub range: TextRange,
    pub category: DiagnosticCategory,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(range: TextRange, message: impl Into<String>) -> Self {
        Diagnostic {
            range,
            category: DiagnosticCategory::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(range: TextRange, message: impl Into<String>) -> Self {
        Diagnostic {
            range,
            category: DiagnosticCategory::Warning,
            message: message.into(),
        }
    }
}

/// Abstract diagnostic destination injected into the evaluator.
///
/// Implementations are free to collect, print, or discard; the evaluator
/// only ever calls `add_diagnostic` (or the `error`/`warning` convenience
/// wrappers) and treats it as fire-and-forget.
pub trait DiagnosticSink {
    fn add_diagnostic(&mut self, diagnostic: Diagnostic);

    /// Takes an owned `String` rather than `impl Into<String>` so the trait
    /// stays object-safe — every call site in the evaluator holds a
    /// `&mut dyn DiagnosticSink`, not a statically-known sink type.
    fn error(&mut self, range: TextRange, message: String) {
        self.add_diagnostic(Diagnostic::error(range, message));
    }

    fn warning(&mut self, range: TextRange, message: String) {
        self.add_diagnostic(Diagnostic::warning(range, message));
    }
}

/// A sink that discards everything written to it.
///
/// Used as the detached sink during speculative overload resolution (§5:
/// "the overload-probing routine temporarily detaches the diagnostic sink").
#[derive(Default)]
pub struct NullDiagnosticSink;

impl DiagnosticSink for NullDiagnosticSink {
    fn add_diagnostic(&mut self, _diagnostic: Diagnostic) {}
}

/// A plain `Vec`-backed sink, handy for tests and simple drivers.
#[derive(Default)]
pub struct VecDiagnosticSink(pub Vec<Diagnostic>);

impl DiagnosticSink for VecDiagnosticSink {
    fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }
}

/// The three-state level configurable diagnostics are reported at (§6, §7.2).
///
/// Distinct from [`DiagnosticCategory`]: a `DiagnosticLevel` is a
/// configuration value that is resolved down to a category (or to nothing)
/// before a diagnostic is ever constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DiagnosticLevel {
    None,
    Warning,
    #[default]
    Error,
}

impl DiagnosticLevel {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Route a configurable diagnostic through its configured level.
///
/// This is the single chokepoint described in §6 ("Error-level mapping"):
/// `addDiagnostic(level, msg, range)`. `level == none` suppresses the
/// diagnostic entirely rather than constructing and discarding it.
pub fn add_configurable_diagnostic(
    sink: &mut dyn DiagnosticSink,
    level: DiagnosticLevel,
    range: TextRange,
    message: impl Into<String>,
) {
    match level {
        DiagnosticLevel::None => {}
        DiagnosticLevel::Warning => sink.warning(range, message.into()),
        DiagnosticLevel::Error => sink.error(range, message.into()),
    }
}
