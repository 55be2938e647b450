//! # Error Types
//!
//! Coercion fails with one of two kinds, both carrying the [`ErrorPath`]
//! leaf where the failure was detected:
//!
//! - [`TypeError`]: the value failed the structural test of the type
//!   expected at that position.
//! - [`UnexpectedAttributeError`]: an object carried an attribute its
//!   schema's unknown-attribute policy disallows.
//!
//! Enum resolution is the only place these are caught; see
//! [`CoerceError::is_mismatch`].

use thiserror::Error;

use crate::path::ErrorPath;
use crate::types::SchemaType;
use crate::value::Value;

/// A value did not match the type expected at `path`.
#[derive(Error, Debug, Clone)]
#[error("TypeError at {path}: expected={}, value={value}", .path.ty())]
pub struct TypeError {
    pub path: ErrorPath,
    pub value: Value,
}

impl TypeError {
    /// The type that was expected.
    pub fn ty(&self) -> &SchemaType {
        self.path.ty()
    }
}

/// An object contained an attribute its policy disallows.
#[derive(Error, Debug, Clone)]
#[error("UnexpectedAttributeError at {path}: attribute={attribute}")]
pub struct UnexpectedAttributeError {
    pub path: ErrorPath,
    pub attribute: String,
}

/// Failure of a coercion call.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum CoerceError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    UnexpectedAttribute(#[from] UnexpectedAttributeError),
}

impl CoerceError {
    /// The path node where the failure was detected.
    pub fn path(&self) -> &ErrorPath {
        match self {
            CoerceError::Type(e) => &e.path,
            CoerceError::UnexpectedAttribute(e) => &e.path,
        }
    }

    /// Structural mismatches: the kinds an enum may swallow while trying
    /// its next alternative. Both current kinds qualify; a kind added later
    /// must opt in here or it escapes enum backtracking.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            CoerceError::Type(_) | CoerceError::UnexpectedAttribute(_)
        )
    }

    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            CoerceError::Type(e) => Some(e),
            CoerceError::UnexpectedAttribute(_) => None,
        }
    }

    pub fn as_unexpected_attribute(&self) -> Option<&UnexpectedAttributeError> {
        match self {
            CoerceError::UnexpectedAttribute(e) => Some(e),
            CoerceError::Type(_) => None,
        }
    }
}

/// Errors raised while binding names in a [`Namespace`](crate::Namespace).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The name is already bound.
    #[error("type '{0}' is already defined")]
    Duplicate(String),

    /// Names must be non-empty.
    #[error("type name must not be empty")]
    EmptyName,
}
