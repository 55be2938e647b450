//! # jshape-core: Schema Algebra for Dynamic Values
//!
//! A small algebra of composable schema values that validate a
//! dynamically-typed value (as produced by a JSON parser), convert it into a
//! normalized form, and on failure report exactly where and what was
//! expected.
//!
//! ## Key Design Principles
//!
//! 1. **Closed variant set.** [`TypeKind`] is a single enum; coercion,
//!    equality and display all `match` on it exhaustively.
//!
//! 2. **Immutable, shareable schemas.** A [`SchemaType`] is an `Arc` handle.
//!    Aliasing returns a new handle; nothing is mutated after construction,
//!    so one schema graph serves any number of threads.
//!
//! 3. **Errors carry their path.** Every [`CoerceError`] holds the
//!    [`ErrorPath`] leaf where coercion stopped; `jshape-report` turns it
//!    into a trace plus a legend of named sub-schemas.
//!
//! 4. **Bounded backtracking.** Enums are the only place a coercion error is
//!    caught, and only structural mismatches are.
//!
//! ## Crate Policy
//!
//! - No I/O, no global mutable state.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod builder;
mod coerce;
pub mod error;
pub mod namespace;
pub mod path;
pub mod types;
pub mod value;

pub use error::{CoerceError, NamespaceError, TypeError, UnexpectedAttributeError};
pub use namespace::Namespace;
pub use path::{ErrorPath, Step};
pub use types::{
    BaseKind, Detector, EnumType, FieldMap, ObjectType, SchemaType, TypeKind, UnknownPolicy,
};
pub use value::{Atom, Value};
