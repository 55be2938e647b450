//! # jshape-cli: Schema Checking from the Command Line
//!
//! Provides the `jshape` binary: named schemas are declared in a YAML or
//! JSON file (see [`decl`]) and documents are checked against them.
//!
//! ## Subcommands
//!
//! - `jshape check --decl types.yaml --type checkout order.json`: coerce a
//!   document; print the normalized value, or the error and its report.
//! - `jshape show --decl types.yaml [NAME]`: print type definitions.
//!
//! ## Exit Codes
//!
//! `0` success, `1` the document does not match, `2` operational failure
//! (unreadable files, bad declarations, unknown type names).

pub mod check;
pub mod config;
pub mod decl;
pub mod show;

use std::path::Path;

use anyhow::{Context, Result};

use jshape_core::Namespace;

/// Load and resolve a declaration file.
pub fn load_declarations(path: &Path) -> Result<Namespace> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read declarations {}", path.display()))?;
    let namespace = decl::parse_declarations(&source)
        .with_context(|| format!("failed to load declarations {}", path.display()))?;
    tracing::info!(path = %path.display(), types = namespace.len(), "loaded declarations");
    Ok(namespace)
}

/// Read a document, as YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("failed to parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("failed to parse JSON {}", path.display()))
    }
}
