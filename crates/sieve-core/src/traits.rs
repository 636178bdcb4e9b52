//! Capability traits the extractor is written against.
//!
//! - `Schema`         — validates an arbitrary input and owns its rules
//! - `IssueFlattener` — turns raw issues into field-keyed messages
//!
//! The extractor never inspects a schema's rules. Any engine that can
//! classify an input as accepted or rejected plugs in here.

use serde_json::Value;

use sieve_contracts::{FlattenedIssues, Issue, ValidationOutcome};

/// A compiled, immutable description of an expected input.
///
/// Implementations must be deterministic for the extractor's operations to be
/// repeatable. `try_validate` must not fail: a schema that cannot be evaluated
/// should have been rejected when it was constructed.
pub trait Schema: Send + Sync {
    /// The typed value produced for an accepted input.
    type Output;
    /// The error raised by `validate_or_throw` on rejection.
    type Error: std::error::Error;

    /// Stable identifier used in log events and error messages.
    fn schema_id(&self) -> &str;

    /// Validate `input`, returning the tagged outcome.
    fn try_validate(&self, input: &Value) -> ValidationOutcome<Self::Output>;

    /// Wrap the issues of a rejected input in this engine's error type.
    fn rejection(&self, issues: Vec<Issue>) -> Self::Error;

    /// Validate `input` and raise the engine error on rejection.
    ///
    /// The provided implementation classifies via `try_validate` and converts
    /// a rejection with `rejection`, so both paths share one evaluation.
    fn validate_or_throw(&self, input: &Value) -> Result<Self::Output, Self::Error> {
        match self.try_validate(input) {
            ValidationOutcome::Accepted { output } => Ok(output),
            ValidationOutcome::Rejected { issues } => Err(self.rejection(issues)),
        }
    }
}

/// Converts a raw issue list into messages keyed by field path.
///
/// Must be pure: the same issues always flatten to the same value.
pub trait IssueFlattener: Send + Sync {
    fn flatten(&self, issues: &[Issue]) -> FlattenedIssues;
}
