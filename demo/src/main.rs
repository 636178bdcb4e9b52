//! SIEVE — command-line extractor
//!
//! Validates a JSON document against a schema file using one of the three
//! extractor operations, or runs the built-in sign-up scenarios.
//!
//! Usage:
//!   cargo run -p demo -- check --schema schema.toml --input user.json
//!   cat user.json | cargo run -p demo -- check --schema schema.toml --mode parse
//!   cargo run -p demo -- scenarios

mod scenarios;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sieve_contracts::{FlattenedIssues, SieveError, SieveResult};
use sieve_core::extract;
use sieve_jsonschema::JsonSchema;

/// Exit code for a document that was validated and rejected.
const EXIT_REJECTED: u8 = 2;

// ── CLI definition ────────────────────────────────────────────────────────────

/// SIEVE — schema-bound extraction with normalized results.
#[derive(Parser)]
#[command(
    name = "sieve",
    about = "Validate JSON documents against a schema file",
    long_about = "Validates a JSON document against a TOML or JSON schema file and prints\n\
                  the normalized result, the raw outcome, or the parsed output."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one document.
    Check {
        /// Schema file (`.toml` or `.json`).
        #[arg(long)]
        schema: PathBuf,
        /// Input document. Reads stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Which extractor operation to run.
        #[arg(long, value_enum, default_value_t = Mode::From)]
        mode: Mode,
    },
    /// Run the built-in sign-up scenarios.
    Scenarios,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Normalized `{success, output, issues}` result.
    From,
    /// The engine's raw accepted/rejected outcome.
    Safe,
    /// Output only; rejection is an error.
    Parse,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            schema,
            input,
            mode,
        } => run_check(&schema, input.as_deref(), mode),
        Command::Scenarios => scenarios::run_all().map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sieve error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ── check ─────────────────────────────────────────────────────────────────────

fn run_check(schema_path: &Path, input_path: Option<&Path>, mode: Mode) -> SieveResult<ExitCode> {
    let schema: JsonSchema = JsonSchema::from_file(schema_path)?;
    let input = read_input(input_path)?;
    let extractor = extract(&schema);

    match mode {
        Mode::From => {
            let result = extractor.from(&input, Some(&log_issues));
            print_json(&result)?;
            Ok(exit_for(result.success()))
        }
        Mode::Safe => {
            let outcome = extractor.safe(&input, Some(&log_issues));
            print_json(&outcome)?;
            Ok(exit_for(outcome.is_accepted()))
        }
        Mode::Parse => {
            let output = extractor.parse(&input)?;
            print_json(&output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Validation hook: one log line per message.
fn log_issues(issues: &FlattenedIssues) {
    for message in issues.root() {
        warn!(field = "(root)", %message, "validation issue");
    }
    for (field, messages) in issues.fields() {
        for message in messages {
            warn!(field, %message, "validation issue");
        }
    }
}

fn read_input(path: Option<&Path>) -> SieveResult<Value> {
    match path {
        Some(path) => parse_input(BufReader::new(File::open(path)?)),
        None => parse_input(io::stdin().lock()),
    }
}

/// Parse a JSON document. Syntax errors are `InvalidInput`; read failures
/// stay `Io`.
fn parse_input<R: Read>(reader: R) -> SieveResult<Value> {
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            SieveError::Io(io::Error::from(e))
        } else {
            SieveError::InvalidInput {
                reason: format!("input is not valid JSON: {}", e),
            }
        }
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> SieveResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{text}");
    Ok(())
}

fn exit_for(accepted: bool) -> ExitCode {
    if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use sieve_contracts::SieveError;

    use super::parse_input;

    #[test]
    fn test_parse_input_accepts_json() {
        let value = parse_input(r#"{ "age": 30 }"#.as_bytes()).unwrap();
        assert_eq!(value, json!({ "age": 30 }));
    }

    #[test]
    fn test_malformed_input_is_invalid_input() {
        let err = parse_input(r#"{ "age": "#.as_bytes()).unwrap_err();
        match err {
            SieveError::InvalidInput { reason } => assert!(reason.contains("not valid JSON")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    /// A reader that always fails, standing in for a broken pipe.
    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_read_failure_stays_io() {
        let err = parse_input(FailingReader).unwrap_err();
        assert!(matches!(err, SieveError::Io(_)), "got {:?}", err);
    }
}
