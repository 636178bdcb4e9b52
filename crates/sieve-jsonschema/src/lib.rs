//! # sieve-jsonschema
//!
//! A [`sieve_core::Schema`] implementation backed by the `jsonschema` crate.
//!
//! [`JsonSchema`] compiles a JSON Schema document once and validates inputs
//! in three phases: field transforms, structural validation, and typed
//! deserialization into the output type.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use sieve_core::extract;
//! use sieve_jsonschema::JsonSchema;
//!
//! let schema: JsonSchema = JsonSchema::from_file(Path::new("schemas/user.toml"))?;
//! let result = extract(&schema).from(&input, None);
//! ```

pub mod config;
pub mod engine;
pub mod transform;

pub use config::{FieldTransform, SchemaConfig, TransformOp};
pub use engine::JsonSchema;
