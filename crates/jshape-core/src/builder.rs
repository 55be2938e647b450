//! # Declaration Builders
//!
//! Factory functions for assembling schemas:
//!
//! ```
//! use jshape_core::builder::*;
//!
//! let item = object([("name", string()), ("count", numeric()), ("price", numeric())]);
//! let checkout = object([
//!     ("items", array(item)),
//!     ("change", number_opt()),
//!     ("type", enum_of([literal(1), atom()])),
//! ]);
//! assert!(checkout.matches(&serde_json::json!({"items": [], "type": 1}).into()));
//! ```
//!
//! Functions ending in `_opt` wrap their result in [`optional`].

use crate::types::{BaseKind, Detector, EnumType, FieldMap, ObjectType, SchemaType, TypeKind};
use crate::value::Value;

pub fn any() -> SchemaType {
    BaseKind::Any.into()
}

pub fn string() -> SchemaType {
    BaseKind::String.into()
}

pub fn number() -> SchemaType {
    BaseKind::Number.into()
}

pub fn integer() -> SchemaType {
    BaseKind::Integer.into()
}

pub fn boolean() -> SchemaType {
    BaseKind::Boolean.into()
}

/// A number or a numeric-looking string.
pub fn numeric() -> SchemaType {
    BaseKind::Numeric.into()
}

/// A string or atom, normalized to an atom.
pub fn atom() -> SchemaType {
    BaseKind::Atom.into()
}

/// Exactly `value`.
pub fn literal(value: impl Into<Value>) -> SchemaType {
    SchemaType::new(TypeKind::Literal(value.into()))
}

/// `null`, or a value accepted by `ty`.
pub fn optional(ty: impl Into<SchemaType>) -> SchemaType {
    SchemaType::new(TypeKind::Optional(ty.into()))
}

pub fn array(ty: impl Into<SchemaType>) -> SchemaType {
    SchemaType::new(TypeKind::Array(ty.into()))
}

/// An object with arbitrary keys whose values are all accepted by `ty`.
pub fn dictionary(ty: impl Into<SchemaType>) -> SchemaType {
    SchemaType::new(TypeKind::Dictionary(ty.into()))
}

/// Object schema with the default unknown-attribute policy, for chaining
/// policy builders such as [`ObjectType::ignore`].
pub fn object_type<I, K, T>(fields: I) -> ObjectType
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<SchemaType>,
{
    ObjectType::with_fields(fields.into_iter().collect())
}

/// Object schema. Rejects undeclared attributes unless `fields` is empty.
pub fn object<I, K, T>(fields: I) -> SchemaType
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<SchemaType>,
{
    object_type(fields).into()
}

/// Object schema with no fields; accepts any object and keeps nothing.
pub fn empty_object() -> SchemaType {
    ObjectType::with_fields(FieldMap::new()).into()
}

/// First alternative (in order) that accepts the value.
pub fn enum_of<I, T>(alternatives: I) -> SchemaType
where
    I: IntoIterator<Item = T>,
    T: Into<SchemaType>,
{
    EnumType::new(alternatives.into_iter().map(Into::into).collect()).into()
}

/// Enum whose `detector` may pick an alternative up front.
pub fn enum_with_detector<I, T>(alternatives: I, detector: Detector) -> SchemaType
where
    I: IntoIterator<Item = T>,
    T: Into<SchemaType>,
{
    EnumType::with_detector(alternatives.into_iter().map(Into::into).collect(), detector).into()
}

pub fn any_opt() -> SchemaType {
    optional(any())
}

pub fn string_opt() -> SchemaType {
    optional(string())
}

pub fn number_opt() -> SchemaType {
    optional(number())
}

pub fn integer_opt() -> SchemaType {
    optional(integer())
}

pub fn boolean_opt() -> SchemaType {
    optional(boolean())
}

pub fn numeric_opt() -> SchemaType {
    optional(numeric())
}

pub fn atom_opt() -> SchemaType {
    optional(atom())
}

pub fn literal_opt(value: impl Into<Value>) -> SchemaType {
    optional(literal(value))
}

pub fn array_opt(ty: impl Into<SchemaType>) -> SchemaType {
    optional(array(ty))
}

pub fn dictionary_opt(ty: impl Into<SchemaType>) -> SchemaType {
    optional(dictionary(ty))
}

pub fn object_opt<I, K, T>(fields: I) -> SchemaType
where
    I: IntoIterator<Item = (K, T)>,
    K: Into<String>,
    T: Into<SchemaType>,
{
    optional(object(fields))
}

pub fn enum_opt<I, T>(alternatives: I) -> SchemaType
where
    I: IntoIterator<Item = T>,
    T: Into<SchemaType>,
{
    optional(enum_of(alternatives))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnknownPolicy;

    #[test]
    fn shorthands_wrap_in_optional() {
        assert_eq!(string_opt(), optional(string()));
        assert_eq!(array_opt(number()), optional(array(number())));
        assert_eq!(enum_opt([literal(1)]), optional(enum_of([literal(1)])));
        assert_eq!(object_opt([("a", any())]), optional(object([("a", any())])));
        assert!(any_opt().is_optional());
    }

    #[test]
    fn object_defaults() {
        assert_eq!(
            empty_object().as_object().unwrap().unknown_policy(),
            UnknownPolicy::Ignore
        );
        assert_eq!(
            object([("a", any())]).as_object().unwrap().unknown_policy(),
            UnknownPolicy::Reject
        );
    }

    #[test]
    fn object_keeps_declaration_order() {
        let ty = object([("z", any()), ("a", any()), ("m", any())]);
        let names: Vec<&str> = ty.as_object().unwrap().fields().iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
