//! Error types for the SIEVE crates.
//!
//! Rejections only surface as errors through `Extractor::parse`; `from` and
//! `safe` report them as data.

use thiserror::Error;

use crate::issue::Issue;

/// The unified error type for SIEVE.
#[derive(Debug, Error)]
pub enum SieveError {
    /// The input failed one or more schema rules.
    #[error("input rejected by schema '{schema_id}':\n{}", render_issues(.issues))]
    Rejected { schema_id: String, issues: Vec<Issue> },

    /// The schema document itself could not be compiled.
    #[error("invalid schema '{schema_id}': {reason}")]
    InvalidSchema { schema_id: String, reason: String },

    /// A schema file is missing, unreadable, or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The input document is not well-formed.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Reading input failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SieveError {
    /// The raw issues carried by a rejection, if this is one.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            SieveError::Rejected { issues, .. } => Some(issues),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the SIEVE crates.
pub type SieveResult<T> = Result<T, SieveError>;

fn render_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}
