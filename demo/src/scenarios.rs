//! Built-in sign-up scenarios.
//!
//! The schema requires `email` (trimmed, then checked as an email address)
//! and a numeric `age`. Each scenario runs one extractor operation and prints
//! what the caller observes.

use std::cell::Cell;

use serde_json::{json, Value};

use sieve_contracts::{FlattenedIssues, SieveError, SieveResult};
use sieve_core::extract;
use sieve_jsonschema::JsonSchema;

/// Embedded copy of the bundled sign-up schema.
const USER_SCHEMA: &str = include_str!("../../crates/sieve-jsonschema/schemas/user.toml");

pub fn run_all() -> SieveResult<()> {
    let schema: JsonSchema = JsonSchema::from_toml_str(USER_SCHEMA)?;
    let user = extract(&schema);

    let valid = json!({ "email": " a@b.com ", "age": 30 });
    let invalid = json!({ "email": "bad", "age": "x" });

    println!();
    println!("SIEVE — sign-up scenarios");
    println!("=========================");
    println!();

    // ── 1. from, valid input ──────────────────────────────────────────────────
    header(1, "from() with a padded but valid email", &valid);
    show(&user.from(&valid, None))?;

    // ── 2. from, invalid input ────────────────────────────────────────────────
    header(2, "from() with a bad email and a non-numeric age", &invalid);
    show(&user.from(&invalid, None))?;

    // ── 3. from, invalid input, with hook ─────────────────────────────────────
    header(3, "from() with a validation hook", &invalid);
    let calls = Cell::new(0);
    let hook = |issues: &FlattenedIssues| {
        calls.set(calls.get() + 1);
        let fields: Vec<&str> = issues.fields().map(|(field, _)| field).collect();
        println!("  hook fired for fields: {}", fields.join(", "));
    };
    user.from(&invalid, Some(&hook));
    println!("  hook calls: {}", calls.get());
    println!();

    // ── 4. safe, valid input ──────────────────────────────────────────────────
    header(4, "safe() returns the engine outcome", &valid);
    show(&user.safe(&valid, None))?;

    // ── 5. parse, invalid input ───────────────────────────────────────────────
    header(5, "parse() propagates the rejection", &invalid);
    match user.parse(&invalid) {
        Ok(output) => println!("  unexpected output: {output}"),
        Err(e @ SieveError::Rejected { .. }) => println!("  {e}"),
        Err(e) => return Err(e),
    }
    println!();

    println!("All scenarios completed.");
    Ok(())
}

fn header(number: u8, title: &str, input: &Value) {
    println!("=== Scenario {number}: {title} ===");
    println!("  input: {input}");
}

fn show<T: serde::Serialize>(value: &T) -> SieveResult<()> {
    let text = serde_json::to_string(value).map_err(std::io::Error::from)?;
    println!("  result: {text}");
    println!();
    Ok(())
}
