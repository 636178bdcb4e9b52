//! Schema configuration types.
//!
//! A `SchemaConfig` is deserialized from TOML or JSON and holds the JSON
//! Schema document plus an ordered list of `FieldTransform`s applied to the
//! input before validation.
//!
//! Example in TOML:
//! ```toml
//! schema_id = "user-v1"
//!
//! [json_schema]
//! type = "object"
//!
//! [[transforms]]
//! field_path = "email"
//! op = "trim"
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Stable identifier used in log events and rejection errors.
    pub schema_id: String,

    /// The JSON Schema document (draft 2020-12 unless `$schema` says otherwise).
    pub json_schema: Value,

    /// Rewrites applied to the input, in order, before validation.
    #[serde(default)]
    pub transforms: Vec<FieldTransform>,
}

/// A rewrite of the value found at `field_path`.
///
/// `field_path` is dot-notation (`"address.street"`). Numeric segments index
/// arrays and `*` matches every element of an array or object. An empty path
/// targets the input itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTransform {
    pub field_path: String,
    #[serde(flatten)]
    pub op: TransformOp,
}

impl FieldTransform {
    pub fn new(field_path: impl Into<String>, op: TransformOp) -> Self {
        Self {
            field_path: field_path.into(),
            op,
        }
    }
}

/// The supported rewrites, written as a kebab-case `op` in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum TransformOp {
    /// Strip leading and trailing whitespace from a string.
    Trim,
    /// Lowercase a string.
    Lowercase,
    /// Uppercase a string.
    Uppercase,
    /// Fill an absent or null field with `value`.
    Default { value: Value },
}
