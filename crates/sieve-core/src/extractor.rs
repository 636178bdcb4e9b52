//! The extractor: a schema-bound view with three ways to validate.
//!
//!   from  → normalized `ExtractResult`, flattened issues on failure
//!   safe  → the schema's own `ValidationOutcome`, untouched
//!   parse → output or the schema's error, propagated
//!
//! `from` and `safe` take an optional `on_validation_error` hook. It receives
//! the flattened issues exactly once on the rejection path and is never called
//! on success. The hook runs before the result is returned and is not guarded:
//! a panic inside it unwinds through the calling operation.

use serde_json::Value;
use tracing::{debug, warn};

use sieve_contracts::{ExtractResult, FlattenedIssues, Issue, ValidationOutcome};

use crate::flatten::PathFlattener;
use crate::traits::{IssueFlattener, Schema};

/// Hook invoked with the flattened issues when validation fails.
pub type OnValidationError<'a> = dyn Fn(&FlattenedIssues) + 'a;

/// Bind `schema` to an extractor using the default `PathFlattener`.
///
/// ```rust,ignore
/// let user = extract(&user_schema);
/// match user.from(&input, None) {
///     ExtractResult::Success { output } => save(output),
///     ExtractResult::Failure { issues } => report(issues),
/// }
/// ```
pub fn extract<S: Schema + ?Sized>(schema: &S) -> Extractor<'_, S> {
    Extractor::with_flattener(schema, PathFlattener)
}

/// A stateless, schema-bound extractor.
///
/// Holds only a shared borrow of the schema, so one extractor can serve any
/// number of callers, including across threads.
pub struct Extractor<'s, S: ?Sized, F = PathFlattener> {
    schema: &'s S,
    flattener: F,
}

impl<'s, S, F> Extractor<'s, S, F>
where
    S: Schema + ?Sized,
    F: IssueFlattener,
{
    /// Bind `schema` with a caller-supplied flattener.
    pub fn with_flattener(schema: &'s S, flattener: F) -> Self {
        Self { schema, flattener }
    }

    /// The schema this extractor validates against.
    pub fn schema(&self) -> &'s S {
        self.schema
    }

    /// Validate `input` and return the normalized result.
    ///
    /// A rejection is returned as `ExtractResult::Failure` carrying the same
    /// flattened issues that were handed to `on_validation_error`.
    pub fn from(
        &self,
        input: &Value,
        on_validation_error: Option<&OnValidationError<'_>>,
    ) -> ExtractResult<S::Output> {
        match self.schema.try_validate(input) {
            ValidationOutcome::Accepted { output } => {
                debug!(schema_id = %self.schema.schema_id(), "input accepted");
                ExtractResult::Success { output }
            }
            ValidationOutcome::Rejected { issues } => {
                let issues = self.report(&issues, on_validation_error);
                ExtractResult::Failure { issues }
            }
        }
    }

    /// Validate `input` and return the schema's own outcome unchanged.
    ///
    /// The only addition over calling the schema directly is the
    /// `on_validation_error` hook on the rejection path.
    pub fn safe(
        &self,
        input: &Value,
        on_validation_error: Option<&OnValidationError<'_>>,
    ) -> ValidationOutcome<S::Output> {
        let outcome = self.schema.try_validate(input);
        match &outcome {
            ValidationOutcome::Accepted { .. } => {
                debug!(schema_id = %self.schema.schema_id(), "input accepted");
            }
            ValidationOutcome::Rejected { issues } => {
                self.report(issues, on_validation_error);
            }
        }
        outcome
    }

    /// Validate `input`, returning the output or the schema's error.
    ///
    /// No flattening and no hook: failure handling is left to `?`.
    pub fn parse(&self, input: &Value) -> Result<S::Output, S::Error> {
        self.schema.validate_or_throw(input)
    }

    /// Flatten `issues`, log them, and fire the hook once if one was given.
    fn report(
        &self,
        issues: &[Issue],
        on_validation_error: Option<&OnValidationError<'_>>,
    ) -> FlattenedIssues {
        let flattened = self.flattener.flatten(issues);
        warn!(
            schema_id = %self.schema.schema_id(),
            issue_count = issues.len(),
            field_count = flattened.len(),
            "input rejected"
        );
        if let Some(hook) = on_validation_error {
            hook(&flattened);
        }
        flattened
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fmt;

    use serde_json::{json, Value};

    use sieve_contracts::{ExtractResult, FlattenedIssues, Issue, PathSegment, ValidationOutcome};

    use super::{extract, Extractor};
    use crate::traits::{IssueFlattener, Schema};

    // ── Fake schema ───────────────────────────────────────────────────────────

    /// Accepts objects whose `name` is a string and whose `age` is a number.
    /// Output is the upper-cased name, so accepted outputs differ from inputs.
    struct PersonSchema;

    #[derive(Debug, PartialEq)]
    struct FakeRejection(Vec<Issue>);

    impl fmt::Display for FakeRejection {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} issue(s)", self.0.len())
        }
    }

    impl std::error::Error for FakeRejection {}

    fn field_issue(field: &str, message: &str) -> Issue {
        Issue::new("type", message).at(vec![PathSegment::from(field)])
    }

    impl Schema for PersonSchema {
        type Output = String;
        type Error = FakeRejection;

        fn schema_id(&self) -> &str {
            "person-v1"
        }

        fn try_validate(&self, input: &Value) -> ValidationOutcome<String> {
            let mut issues = Vec::new();
            if !input.get("name").is_some_and(Value::is_string) {
                issues.push(field_issue("name", "expected string"));
            }
            if !input.get("age").is_some_and(Value::is_number) {
                issues.push(field_issue("age", "expected number"));
            }
            match input.get("name").and_then(Value::as_str) {
                Some(name) if issues.is_empty() => ValidationOutcome::Accepted {
                    output: name.to_uppercase(),
                },
                _ => ValidationOutcome::Rejected { issues },
            }
        }

        fn rejection(&self, issues: Vec<Issue>) -> FakeRejection {
            FakeRejection(issues)
        }
    }

    fn valid() -> Value {
        json!({ "name": "ada", "age": 36 })
    }

    fn invalid() -> Value {
        json!({ "name": 1, "age": "old" })
    }

    // ── from ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_from_success_has_output_only() {
        let result = extract(&PersonSchema).from(&valid(), None);

        assert!(result.success());
        assert_eq!(result.output().map(String::as_str), Some("ADA"));
        assert!(result.issues().is_none());
    }

    #[test]
    fn test_from_failure_has_issues_only() {
        let result = extract(&PersonSchema).from(&invalid(), None);

        assert!(!result.success());
        assert!(result.output().is_none());
        let issues = result.issues().unwrap();
        assert!(issues.contains_key("name"));
        assert!(issues.contains_key("age"));
    }

    #[test]
    fn test_from_hook_not_called_on_success() {
        let calls = Cell::new(0);
        let hook = |_: &FlattenedIssues| calls.set(calls.get() + 1);

        extract(&PersonSchema).from(&valid(), Some(&hook));

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_from_hook_called_once_with_returned_issues() {
        let seen: RefCell<Vec<FlattenedIssues>> = RefCell::new(Vec::new());
        let hook = |issues: &FlattenedIssues| seen.borrow_mut().push(issues.clone());

        let result = extract(&PersonSchema).from(&invalid(), Some(&hook));

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 1, "hook must fire exactly once");
        assert_eq!(Some(&seen[0]), result.issues());
    }

    // ── safe ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_safe_returns_raw_outcome() {
        let extractor = extract(&PersonSchema);

        assert_eq!(
            extractor.safe(&valid(), None),
            PersonSchema.try_validate(&valid())
        );
        assert_eq!(
            extractor.safe(&invalid(), None),
            PersonSchema.try_validate(&invalid())
        );
    }

    #[test]
    fn test_safe_hook_receives_flattened_issues() {
        let calls = Cell::new(0);
        let hook = |issues: &FlattenedIssues| {
            assert_eq!(issues.get("age").unwrap(), &["expected number".to_string()]);
            calls.set(calls.get() + 1);
        };

        let outcome = extract(&PersonSchema).safe(&invalid(), Some(&hook));

        assert!(!outcome.is_accepted());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_safe_hook_not_called_on_success() {
        let calls = Cell::new(0);
        let hook = |_: &FlattenedIssues| calls.set(calls.get() + 1);

        let outcome = extract(&PersonSchema).safe(&valid(), Some(&hook));

        assert!(outcome.is_accepted());
        assert_eq!(calls.get(), 0);
    }

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_returns_output() {
        assert_eq!(extract(&PersonSchema).parse(&valid()), Ok("ADA".to_string()));
    }

    #[test]
    fn test_parse_propagates_schema_error() {
        let err = extract(&PersonSchema).parse(&invalid()).unwrap_err();
        assert_eq!(err.0.len(), 2);
    }

    #[test]
    fn test_parse_fails_iff_from_fails() {
        let extractor = extract(&PersonSchema);
        let inputs = [
            valid(),
            invalid(),
            json!({ "name": "bob" }),
            json!(null),
            json!({ "name": "eve", "age": 1.5 }),
        ];
        for input in &inputs {
            assert_eq!(
                extractor.parse(input).is_ok(),
                extractor.from(input, None).success(),
                "mismatch for {input}"
            );
        }
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_operations_are_repeatable() {
        let extractor = extract(&PersonSchema);
        for input in [valid(), invalid()] {
            assert_eq!(extractor.from(&input, None), extractor.from(&input, None));
            assert_eq!(extractor.safe(&input, None), extractor.safe(&input, None));
            assert_eq!(extractor.parse(&input), extractor.parse(&input));
        }
    }

    #[test]
    #[should_panic(expected = "hook exploded")]
    fn test_hook_panic_is_not_caught() {
        let hook = |_: &FlattenedIssues| panic!("hook exploded");
        extract(&PersonSchema).from(&invalid(), Some(&hook));
    }

    #[test]
    fn test_custom_flattener_is_used() {
        struct KindFlattener;

        impl IssueFlattener for KindFlattener {
            fn flatten(&self, issues: &[Issue]) -> FlattenedIssues {
                let mut flat = FlattenedIssues::new();
                for issue in issues {
                    flat.push(issue.kind.clone(), issue.message.clone());
                }
                flat
            }
        }

        let extractor = Extractor::with_flattener(&PersonSchema, KindFlattener);
        match extractor.from(&invalid(), None) {
            ExtractResult::Failure { issues } => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues.get("type").map(<[String]>::len), Some(2));
            }
            other => panic!("expected Failure, got {:?}", other),
        }
    }

    #[test]
    fn test_extractor_usable_across_threads() {
        let extractor = extract(&PersonSchema);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert!(extractor.from(&valid(), None).success());
                    assert!(!extractor.from(&invalid(), None).success());
                });
            }
        });
    }
}
