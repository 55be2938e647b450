//! # jshape-report: Coercion Diagnostics
//!
//! Renders a [`jshape_core::CoerceError`] as a human-readable report: a
//! leaf-to-root trace of what was expected at each step, followed by a
//! `Where:` legend defining every named schema the trace mentions.
//!
//! ```
//! use jshape_core::builder::{array, number, object};
//! use jshape_core::Value;
//! use jshape_report::ErrorReporter;
//!
//! let point = object([("x", number()), ("y", number())]).with_alias("point");
//! let path = array(point).with_alias("path");
//!
//! let input = Value::from(serde_json::json!([{"x": 1, "y": "2"}]));
//! let err = path.coerce(&input).unwrap_err();
//! let report = ErrorReporter::for_error(&err).to_string();
//! assert!(report.starts_with(" \"y\" expected to be number\n  0 expected to be point\n"));
//! assert!(report.contains("Where:\n  point = { \"x\": number, \"y\": number }"));
//! ```
//!
//! Layout is width-aware: legend entries that do not fit in
//! [`RenderOptions::width`] columns break inside their braces and
//! parentheses, nesting by two.

pub mod layout;
pub mod options;
pub mod render;

pub use options::RenderOptions;
pub use render::{definition, pretty_str, type_doc, ErrorReporter};
