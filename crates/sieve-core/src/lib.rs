//! # sieve-core
//!
//! Wraps a schema with a normalized result shape and an optional hook that
//! fires on validation failure.
//!
//! This crate provides:
//! - The `Schema` and `IssueFlattener` capability traits
//! - `PathFlattener`, the default dot-path flattener
//! - `extract`, which binds a schema to an `Extractor` exposing
//!   `from`, `safe`, and `parse`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sieve_core::extract;
//!
//! let log_issues = |issues: &FlattenedIssues| eprintln!("{issues:?}");
//! let result = extract(&schema).from(&input, Some(&log_issues));
//! ```

pub mod extractor;
pub mod flatten;
pub mod traits;

pub use extractor::{extract, Extractor, OnValidationError};
pub use flatten::PathFlattener;
pub use traits::{IssueFlattener, Schema};
