//! Configuration consumed by the evaluator (§6: "Consumed from configuration").
//!
//! This lives in `tyeval-common` rather than in `tyeval-checker` so that
//! `tyeval-types` can also read `python_version` (needed for the `_`-prefixed
//! dataclass field rule, §4.5) without creating a cycle back to the checker.

use crate::diagnostics::DiagnosticLevel;

/// Evaluator configuration, mirroring the subset of compiler options the
/// type evaluator actually reads. Everything else (module resolution,
/// output paths, ...) is the driver's problem, not the evaluator's.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Target language version, as a `(major, minor)` pair (e.g. `(3, 10)`).
    /// Only a handful of behaviors are version-gated (§4.5: dataclass field
    /// names beginning with `_` are rejected on 3.7+).
    pub python_version: (u32, u32),

    /// `reportOptionalMemberAccess`: level for accessing a member through a
    /// union that includes `None` (§4.2).
    pub report_optional_member_access: DiagnosticLevel,

    /// `reportOptionalSubscript`: level for subscripting a union that
    /// includes `None` (§4.4, Subscription).
    pub report_optional_subscript: DiagnosticLevel,

    /// `reportOptionalCall`: level for calling a union that includes `None`
    /// (§4.3, Call matcher / Union distribution).
    pub report_optional_call: DiagnosticLevel,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            python_version: (3, 12),
            report_optional_member_access: DiagnosticLevel::Error,
            report_optional_subscript: DiagnosticLevel::Error,
            report_optional_call: DiagnosticLevel::Error,
        }
    }
}

impl EvaluatorConfig {
    #[must_use]
    pub fn supports_underscore_field_rejection(&self) -> bool {
        self.python_version >= (3, 7)
    }
}
