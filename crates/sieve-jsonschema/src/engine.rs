//! JSON Schema backed `Schema` implementation.
//!
//! `JsonSchema<T>` validates an input in three phases:
//!
//! 1. **Transform** — a copy of the input is rewritten by the configured
//!    `FieldTransform`s (trim, lowercase, uppercase, default).
//! 2. **Structural** — the copy is validated against the compiled JSON Schema
//!    document. Every error is collected so callers see the full failure set
//!    in one pass.
//! 3. **Typed** — an accepted copy is deserialized into `T`. A mismatch here
//!    is reported as a single root issue of kind `deserialize`.
//!
//! The document is compiled once, at construction. A document that does not
//! compile is rejected there with `SieveError::InvalidSchema`, which is what
//! lets `try_validate` be infallible.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use sieve_contracts::{Issue, PathSegment, SieveError, SieveResult, ValidationOutcome};
use sieve_core::Schema;

use crate::config::{FieldTransform, SchemaConfig};
use crate::transform;

/// Issue kind used when an accepted document does not fit the output type.
pub const DESERIALIZE_KIND: &str = "deserialize";

/// A compiled JSON Schema plus pre-validation transforms.
///
/// `T` is the output type handed back for accepted inputs. It defaults to
/// `serde_json::Value`, i.e. the transformed input itself.
pub struct JsonSchema<T = Value> {
    schema_id: String,
    document: Value,
    validator: Validator,
    transforms: Vec<FieldTransform>,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> JsonSchema<T> {
    /// Compile `document` with format assertions enabled.
    ///
    /// Returns `SieveError::InvalidSchema` if the document is not a valid
    /// JSON Schema.
    pub fn new(
        schema_id: impl Into<String>,
        document: Value,
        transforms: Vec<FieldTransform>,
    ) -> SieveResult<Self> {
        let schema_id = schema_id.into();

        let mut options = jsonschema::options();
        options.should_validate_formats(true);
        let validator = options.build(&document).map_err(|e| {
            warn!(schema_id = %schema_id, error = %e, "schema compilation failure");
            SieveError::InvalidSchema {
                schema_id: schema_id.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            schema_id = %schema_id,
            transform_count = transforms.len(),
            "schema compiled"
        );

        Ok(Self {
            schema_id,
            document,
            validator,
            transforms,
            _output: PhantomData,
        })
    }

    /// Build from an already-deserialized `SchemaConfig`.
    pub fn from_config(config: SchemaConfig) -> SieveResult<Self> {
        Self::new(config.schema_id, config.json_schema, config.transforms)
    }

    /// Parse `s` as a TOML `SchemaConfig` and compile it.
    ///
    /// Returns `SieveError::ConfigError` if the TOML is malformed or does not
    /// match the expected shape.
    pub fn from_toml_str(s: &str) -> SieveResult<Self> {
        let config: SchemaConfig = toml::from_str(s).map_err(|e| SieveError::ConfigError {
            reason: format!("failed to parse schema TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Parse `s` as a JSON `SchemaConfig` and compile it.
    pub fn from_json_str(s: &str) -> SieveResult<Self> {
        let config: SchemaConfig =
            serde_json::from_str(s).map_err(|e| SieveError::ConfigError {
                reason: format!("failed to parse schema JSON: {}", e),
            })?;
        Self::from_config(config)
    }

    /// Read the schema file at `path`. A `.json` extension selects JSON;
    /// anything else is read as TOML.
    pub fn from_file(path: &Path) -> SieveResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SieveError::ConfigError {
            reason: format!("failed to read schema file '{}': {}", path.display(), e),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }
}

impl<T> JsonSchema<T> {
    /// The uncompiled JSON Schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn transforms(&self) -> &[FieldTransform] {
        &self.transforms
    }

    /// Copy `input` and run the transforms over the copy.
    fn prepare(&self, input: &Value) -> Value {
        let mut prepared = input.clone();
        transform::apply_all(&mut prepared, &self.transforms);
        prepared
    }
}

impl<T> fmt::Debug for JsonSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("schema_id", &self.schema_id)
            .field("document", &self.document)
            .field("transforms", &self.transforms)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Schema for JsonSchema<T> {
    type Output = T;
    type Error = SieveError;

    fn schema_id(&self) -> &str {
        &self.schema_id
    }

    fn try_validate(&self, input: &Value) -> ValidationOutcome<T> {
        let prepared = self.prepare(input);

        // ── Structural validation ─────────────────────────────────────────────
        let issues: Vec<Issue> = self
            .validator
            .iter_errors(&prepared)
            .map(|error| issue_from_error(&error, &prepared))
            .collect();

        if !issues.is_empty() {
            debug!(
                schema_id = %self.schema_id,
                issue_count = issues.len(),
                "structural validation failed"
            );
            return ValidationOutcome::Rejected { issues };
        }

        // ── Typed output ──────────────────────────────────────────────────────
        match serde_json::from_value::<T>(prepared) {
            Ok(output) => ValidationOutcome::Accepted { output },
            Err(e) => {
                debug!(schema_id = %self.schema_id, error = %e, "output deserialization failed");
                ValidationOutcome::Rejected {
                    issues: vec![Issue::new(DESERIALIZE_KIND, e.to_string())],
                }
            }
        }
    }

    fn rejection(&self, issues: Vec<Issue>) -> SieveError {
        SieveError::Rejected {
            schema_id: self.schema_id.clone(),
            issues,
        }
    }
}

// ── Error conversion ──────────────────────────────────────────────────────────

/// Convert one `jsonschema` error into an `Issue`.
///
/// `required` errors point at the parent object; the missing property is
/// appended so the issue lands under the field that is absent.
fn issue_from_error(error: &ValidationError<'_>, instance: &Value) -> Issue {
    let mut path = pointer_segments(&error.instance_path.to_string(), instance);
    let schema_path = error.schema_path.to_string();
    let kind = schema_path
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("schema")
        .to_string();

    let mut expected = None;
    let mut received = Some(error.instance.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            path.push(PathSegment::Key(name));
            received = None;
        }
        ValidationErrorKind::Format { format } => {
            expected = Some(format.clone());
        }
        _ => {}
    }

    Issue {
        kind,
        message: error.to_string(),
        path,
        expected,
        received,
    }
}

/// Split a JSON Pointer (`/tags/0`) into path segments.
///
/// A token is an `Index` only where `instance` holds an array at that point;
/// numeric-looking object keys stay `Key`.
fn pointer_segments(pointer: &str, instance: &Value) -> Vec<PathSegment> {
    let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
    if trimmed.is_empty() {
        return Vec::new();
    }
    let mut current = Some(instance);
    trimmed
        .split('/')
        .map(|raw| {
            let token = raw.replace("~1", "/").replace("~0", "~");
            match (current, token.parse::<usize>()) {
                (Some(Value::Array(items)), Ok(index)) => {
                    current = items.get(index);
                    PathSegment::Index(index)
                }
                (node, _) => {
                    current = node.and_then(|v| v.get(token.as_str()));
                    PathSegment::Key(token)
                }
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
