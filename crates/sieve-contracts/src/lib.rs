//! # sieve-contracts
//!
//! Shared types for the SIEVE extractor: raw issues, flattened issues,
//! validation outcomes, extract results, and the error type.
//!
//! No validation logic lives in this crate, only data definitions.

pub mod error;
pub mod issue;
pub mod outcome;

pub use error::{SieveError, SieveResult};
pub use issue::{FlattenedIssues, Issue, PathSegment};
pub use outcome::{ExtractResult, ValidationOutcome};
