//! # Check Subcommand
//!
//! Coerces one document against a declared type.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jshape_core::{Namespace, Value};
use jshape_report::{ErrorReporter, RenderOptions};

/// Arguments for `jshape check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Declaration file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub decl: PathBuf,

    /// Declared type to check against.
    #[arg(long = "type", value_name = "NAME")]
    pub type_name: String,

    /// Document to check (JSON, or YAML by extension).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Result of checking one document.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The normalized document.
    Valid(Value),
    /// Error line, blank line, then the rendered report.
    Invalid(String),
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when the document matches, 1 when it does not.
pub fn run_check(args: &CheckArgs, options: &RenderOptions) -> Result<u8> {
    let namespace = crate::load_declarations(&args.decl)?;
    let document = crate::read_document(&args.input)?;

    match check_document(&namespace, &args.type_name, &document, options)? {
        CheckOutcome::Valid(value) => {
            let pretty = serde_json::to_string_pretty(&value).context("failed to serialize result")?;
            println!("{pretty}");
            Ok(0)
        }
        CheckOutcome::Invalid(report) => {
            print!("{report}");
            if !report.ends_with('\n') {
                println!();
            }
            Ok(1)
        }
    }
}

/// Coerce `document` against the declared type `type_name`.
pub fn check_document(
    namespace: &Namespace,
    type_name: &str,
    document: &serde_json::Value,
    options: &RenderOptions,
) -> Result<CheckOutcome> {
    let Some(ty) = namespace.get(type_name) else {
        let known: Vec<&str> = namespace.names().collect();
        anyhow::bail!("unknown type '{type_name}' (declared: {})", known.join(", "));
    };

    match ty.coerce_json(document) {
        Ok(value) => Ok(CheckOutcome::Valid(value)),
        Err(err) => {
            tracing::debug!(path = %err.path(), "document rejected");
            let report = ErrorReporter::for_error(&err).with_options(options.clone());
            Ok(CheckOutcome::Invalid(format!("{err}\n\n{report}")))
        }
    }
}
