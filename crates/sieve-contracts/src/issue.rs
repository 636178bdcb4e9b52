//! Validation issue types.
//!
//! An `Issue` is the raw record a validation engine produces for one failed
//! rule. `FlattenedIssues` is the consumer-facing view: messages grouped by
//! dot-joined field path.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One step in the path from the input root to the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object property name.
    Key(String),
    /// An array position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single raw validation issue as reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The rule keyword that failed (e.g. "type", "format", "required").
    pub kind: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// Location of the offending value. Empty for whole-input issues.
    #[serde(default)]
    pub path: Vec<PathSegment>,
    /// What the rule expected, when the engine can say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// What was actually found, when the engine can say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

impl Issue {
    /// Create an issue with no path and no expected/received detail.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            path: Vec::new(),
            expected: None,
            received: None,
        }
    }

    /// Builder-style path setter.
    pub fn at(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Dot-joined path, e.g. `"address.lines.0"`. Empty for root issues.
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Messages grouped by field path.
///
/// Keys in `nested` are unique and iterate in the order they were first seen.
/// Messages under a key keep the order the rules were evaluated in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedIssues {
    root: Vec<String>,
    nested: Vec<(String, Vec<String>)>,
}

impl FlattenedIssues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message that applies to the input as a whole.
    pub fn push_root(&mut self, message: impl Into<String>) {
        self.root.push(message.into());
    }

    /// Append `message` under `path`, creating the entry on first use.
    ///
    /// Lookup is a linear scan over the distinct paths seen so far, sized for
    /// form-scale inputs with a handful of failing fields.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        let message = message.into();
        match self.nested.iter_mut().find(|(key, _)| *key == path) {
            Some((_, messages)) => messages.push(message),
            None => self.nested.push((path, vec![message])),
        }
    }

    /// Messages attached to the input as a whole.
    pub fn root(&self) -> &[String] {
        &self.root
    }

    /// Messages recorded for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.nested
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Field entries in first-seen order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.nested
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Number of distinct field paths.
    pub fn len(&self) -> usize {
        self.nested.len()
    }

    /// True when there are neither root nor field messages.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.nested.is_empty()
    }

    /// Total number of messages across root and all fields.
    pub fn message_count(&self) -> usize {
        self.root.len() + self.nested.iter().map(|(_, m)| m.len()).sum::<usize>()
    }
}

/// Key under which root messages appear in the serialized map.
pub const ROOT_KEY: &str = "$root";

impl Serialize for FlattenedIssues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(!self.root.is_empty());
        let mut map = serializer.serialize_map(Some(self.nested.len() + extra))?;
        if !self.root.is_empty() {
            map.serialize_entry(ROOT_KEY, &self.root)?;
        }
        for (key, messages) in &self.nested {
            map.serialize_entry(key, messages)?;
        }
        map.end()
    }
}
