//! Result shapes returned by the extractor.
//!
//! `ValidationOutcome` is the engine's native tagged result. `ExtractResult`
//! is the normalized form handed back by `Extractor::from`, carrying
//! flattened issues instead of raw ones.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::issue::{FlattenedIssues, Issue};

/// What a validation engine reports for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome<T> {
    /// The input satisfied every rule; `output` is the transformed value.
    Accepted { output: T },
    /// At least one rule failed. Issues are in rule evaluation order.
    Rejected { issues: Vec<Issue> },
}

impl<T> ValidationOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted { .. })
    }

    pub fn output(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Accepted { output } => Some(output),
            ValidationOutcome::Rejected { .. } => None,
        }
    }

    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            ValidationOutcome::Accepted { .. } => None,
            ValidationOutcome::Rejected { issues } => Some(issues),
        }
    }

    /// Convert into a plain `Result`, keeping the raw issues as the error.
    pub fn into_result(self) -> Result<T, Vec<Issue>> {
        match self {
            ValidationOutcome::Accepted { output } => Ok(output),
            ValidationOutcome::Rejected { issues } => Err(issues),
        }
    }
}

/// Normalized result of `Extractor::from`.
///
/// Exactly one of output/issues exists per value; the enum makes that
/// structural. Serializes as `{"success", "output", "issues"}` with the
/// absent side written as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractResult<T> {
    Success { output: T },
    Failure { issues: FlattenedIssues },
}

impl<T> ExtractResult<T> {
    pub fn success(&self) -> bool {
        matches!(self, ExtractResult::Success { .. })
    }

    pub fn output(&self) -> Option<&T> {
        match self {
            ExtractResult::Success { output } => Some(output),
            ExtractResult::Failure { .. } => None,
        }
    }

    pub fn issues(&self) -> Option<&FlattenedIssues> {
        match self {
            ExtractResult::Success { .. } => None,
            ExtractResult::Failure { issues } => Some(issues),
        }
    }

    pub fn into_output(self) -> Option<T> {
        match self {
            ExtractResult::Success { output } => Some(output),
            ExtractResult::Failure { .. } => None,
        }
    }
}

impl<T: Serialize> Serialize for ExtractResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExtractResult", 3)?;
        state.serialize_field("success", &self.success())?;
        state.serialize_field("output", &self.output())?;
        state.serialize_field("issues", &self.issues())?;
        state.end()
    }
}
