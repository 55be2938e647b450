//! # Coercion Engine
//!
//! Validates a [`Value`] against a [`SchemaType`] and produces the
//! normalized value. Each variant owns its algorithm; dispatch is an
//! exhaustive `match` on [`TypeKind`].
//!
//! ## Failure
//!
//! The first failure aborts the whole call. Errors carry the path leaf at
//! which they were detected; nothing is aggregated.
//!
//! ## Enum Resolution
//!
//! 1. A detector that names one of the alternatives commits to it: that
//!    alternative's result (success or failure) is the enum's result.
//! 2. Otherwise alternatives are tried in order. Structural mismatches move
//!    on to the next alternative; anything else propagates.
//! 3. If nothing matches, the error names the enum itself.
//!
//! Attempts never mutate shared state, so a rejected alternative leaves
//! nothing to roll back.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{CoerceError, TypeError, UnexpectedAttributeError};
use crate::path::ErrorPath;
use crate::types::{BaseKind, EnumType, ObjectType, SchemaType, TypeKind};
use crate::value::Value;

impl SchemaType {
    /// Coerce `value`, starting a fresh path rooted at this schema.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError::Type`] when a value fails the structural test
    /// of the type expected at its position, and
    /// [`CoerceError::UnexpectedAttribute`] when an object carries an
    /// attribute its policy disallows.
    pub fn coerce(&self, value: &Value) -> Result<Value, CoerceError> {
        self.coerce_at(value, &ErrorPath::root(self.clone()))
    }

    /// Convert a parsed JSON document and coerce it.
    pub fn coerce_json(&self, value: &serde_json::Value) -> Result<Value, CoerceError> {
        self.coerce(&Value::from(value))
    }

    /// Whether `value` coerces successfully.
    pub fn matches(&self, value: &Value) -> bool {
        self.coerce(value).is_ok()
    }

    /// Coerce `value` at `path`, whose node must expect this schema.
    pub fn coerce_at(&self, value: &Value, path: &ErrorPath) -> Result<Value, CoerceError> {
        match self.kind() {
            TypeKind::Base(base) => coerce_base(*base, value, path),
            TypeKind::Optional(inner) => {
                if value.is_null() {
                    Ok(Value::Null)
                } else {
                    inner.coerce_at(value, &path.expand(inner.clone()))
                }
            }
            TypeKind::Literal(expected) => {
                if value == expected {
                    Ok(value.clone())
                } else {
                    Err(mismatch(path, value))
                }
            }
            TypeKind::Array(inner) => {
                let items = value.as_array().ok_or_else(|| mismatch(path, value))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| inner.coerce_at(item, &path.dig_index(i, inner.clone())))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            TypeKind::Dictionary(inner) => {
                let map = value.as_object().ok_or_else(|| mismatch(path, value))?;
                map.iter()
                    .map(|(key, item)| {
                        inner
                            .coerce_at(item, &path.dig_field(key.as_str(), inner.clone()))
                            .map(|coerced| (key.clone(), coerced))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>()
                    .map(Value::Object)
            }
            TypeKind::Object(object) => coerce_object(object, value, path),
            TypeKind::Enum(e) => coerce_enum(e, value, path),
        }
    }
}

fn mismatch(path: &ErrorPath, value: &Value) -> CoerceError {
    CoerceError::Type(TypeError {
        path: path.clone(),
        value: value.clone(),
    })
}

fn coerce_base(base: BaseKind, value: &Value, path: &ErrorPath) -> Result<Value, CoerceError> {
    if !base.test(value) {
        return Err(mismatch(path, value));
    }
    match (base, value) {
        (BaseKind::Atom, Value::String(s)) => Ok(Value::Atom(s.as_str().into())),
        _ => Ok(value.clone()),
    }
}

fn coerce_object(
    object: &ObjectType,
    value: &Value,
    path: &ErrorPath,
) -> Result<Value, CoerceError> {
    let map = value.as_object().ok_or_else(|| mismatch(path, value))?;

    for attribute in map.keys().filter(|k| !object.fields().contains(k)) {
        if object.rejects(attribute) {
            return Err(CoerceError::UnexpectedAttribute(UnexpectedAttributeError {
                path: path.clone(),
                attribute: attribute.clone(),
            }));
        }
        trace!(%path, attribute = %attribute, "dropping unknown attribute");
    }

    let mut result = IndexMap::with_capacity(object.fields().len());
    for (name, ty) in object.fields().iter() {
        let field = map.get(name).unwrap_or(&Value::Null);
        let coerced = ty.coerce_at(field, &path.dig_field(name, ty.clone()))?;
        result.insert(name.to_string(), coerced);
    }
    Ok(Value::Object(result))
}

fn coerce_enum(e: &EnumType, value: &Value, path: &ErrorPath) -> Result<Value, CoerceError> {
    if let Some(detector) = e.detector() {
        let selected = detector(value)
            .and_then(|candidate| e.alternatives().iter().find(|alt| **alt == candidate));
        if let Some(alt) = selected {
            debug!(%path, alternative = %alt, "detector selected enum alternative");
            return alt.coerce_at(value, &path.expand(alt.clone()));
        }
    }

    for alt in e.alternatives() {
        match alt.coerce_at(value, &path.expand(alt.clone())) {
            Ok(coerced) => return Ok(coerced),
            Err(err) if err.is_mismatch() => {
                trace!(%path, alternative = %alt, error = %err, "enum alternative rejected");
            }
            // Every current error kind is a mismatch; new kinds propagate.
            Err(err) => return Err(err),
        }
    }

    Err(mismatch(path, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::types::Detector;
    use crate::value::Atom;
    use serde_json::json;
    use std::sync::Arc;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn base_returns_value_unchanged() {
        assert_eq!(numeric().coerce(&v(json!("2.33"))).unwrap(), v(json!("2.33")));
        assert_eq!(number().coerce(&v(json!(2.5))).unwrap(), v(json!(2.5)));
        assert_eq!(any().coerce(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn atom_canonicalizes_strings() {
        let expected = Value::Atom(Atom::new("foo"));
        assert_eq!(atom().coerce(&v(json!("foo"))).unwrap(), expected);
        assert_eq!(atom().coerce(&expected).unwrap(), expected);
        assert!(atom().coerce(&Value::Bool(false)).is_err());
    }

    #[test]
    fn base_failure_is_type_error_at_root() {
        let err = string().coerce(&v(json!(3))).unwrap_err();
        let type_error = err.as_type_error().unwrap();
        assert_eq!(type_error.path.to_string(), "$");
        assert_eq!(type_error.ty(), &string());
    }

    #[test]
    fn optional_accepts_null_and_delegates() {
        let ty = optional(number());
        assert_eq!(ty.coerce(&Value::Null).unwrap(), Value::Null);
        assert_eq!(ty.coerce(&v(json!(3))).unwrap(), v(json!(3)));

        let err = ty.coerce(&v(json!("a"))).unwrap_err();
        assert_eq!(err.path().to_string(), "$");
        assert_eq!(err.path().ty(), &number());
        assert_eq!(err.path().parent().unwrap().1.ty(), &ty);
    }

    #[test]
    fn literal_requires_equality() {
        let three = literal(3);
        assert!(three.matches(&v(json!(3))));
        assert!(!three.matches(&v(json!(4))));
        assert!(!three.matches(&Value::Bool(true)));
    }

    #[test]
    fn array_maps_elements() {
        assert_eq!(array(any()).coerce(&v(json!([]))).unwrap(), v(json!([])));
        assert_eq!(array(number()).coerce(&v(json!([1]))).unwrap(), v(json!([1])));
        assert_eq!(
            array(array(number())).coerce(&v(json!([[1]]))).unwrap(),
            v(json!([[1]]))
        );
        assert!(array(number()).coerce(&v(json!({}))).is_err());
        assert!(array(number()).coerce(&Value::Null).is_err());
    }

    #[test]
    fn array_failure_reports_index() {
        let err = array(number()).coerce(&v(json!([1, 2, "a"]))).unwrap_err();
        assert_eq!(err.path().to_string(), "$[2]");
    }

    #[test]
    fn dictionary_keeps_every_key() {
        let ty = dictionary(number());
        assert_eq!(
            ty.coerce(&v(json!({"foo": 123, "bar": 234}))).unwrap(),
            v(json!({"foo": 123, "bar": 234}))
        );
        let err = ty.coerce(&v(json!(1))).unwrap_err();
        assert_eq!(err.path().to_string(), "$");
        let err = ty.coerce(&v(json!({"foo": "hello"}))).unwrap_err();
        assert_eq!(err.path().to_string(), "$.foo");
    }

    #[test]
    fn object_accepts_declared_fields() {
        let ty = object([("a", numeric()), ("b", string())]);
        assert_eq!(
            ty.coerce(&v(json!({"a": 123, "b": "test"}))).unwrap(),
            v(json!({"a": 123, "b": "test"}))
        );
    }

    #[test]
    fn object_rejects_unknown_by_default() {
        let ty = object([("a", number())]);
        let err = ty.coerce(&v(json!({"a": 1, "b": true}))).unwrap_err();
        let unexpected = err.as_unexpected_attribute().unwrap();
        assert_eq!(unexpected.attribute, "b");
        assert_eq!(unexpected.path.to_string(), "$");
    }

    #[test]
    fn unknown_attributes_checked_before_fields() {
        let ty = object([("a", numeric())]);
        let err = ty.coerce(&v(json!({"b": "test"}))).unwrap_err();
        assert_eq!(err.as_unexpected_attribute().unwrap().attribute, "b");
    }

    #[test]
    fn missing_required_field_is_type_error() {
        let ty = object([("a", numeric())]);
        let err = ty.coerce(&v(json!({}))).unwrap_err();
        assert_eq!(err.path().to_string(), "$.a");
        assert_eq!(err.as_type_error().unwrap().value, Value::Null);
    }

    #[test]
    fn missing_optional_field_becomes_null() {
        let ty = object([("a", numeric_opt())]);
        assert_eq!(ty.coerce(&v(json!({}))).unwrap(), v(json!({"a": null})));
        assert_eq!(ty.coerce(&v(json!({"a": "-123"}))).unwrap(), v(json!({"a": "-123"})));
        assert_eq!(ty.coerce(&v(json!({"a": null}))).unwrap(), v(json!({"a": null})));
    }

    #[test]
    fn empty_object_ignores_everything() {
        assert_eq!(
            empty_object().coerce(&v(json!({"x": 1, "y": [2]}))).unwrap(),
            v(json!({}))
        );
    }

    #[test]
    fn policy_matrix() {
        let base = object_type([("a", number())]);
        let input = v(json!({"a": 1, "x": true}));

        // Reject, not excepted: error.
        let err = SchemaType::from(base.reject_all()).coerce(&input).unwrap_err();
        assert_eq!(err.as_unexpected_attribute().unwrap().attribute, "x");

        // Reject, excepted: dropped.
        let ok = SchemaType::from(base.ignore(["x"])).coerce(&input).unwrap();
        assert_eq!(ok, v(json!({"a": 1})));

        // Ignore, not excepted: dropped.
        let ok = SchemaType::from(base.ignore_all()).coerce(&input).unwrap();
        assert_eq!(ok, v(json!({"a": 1})));

        // Ignore, excepted: error.
        let err = SchemaType::from(base.ignore_except(["x"])).coerce(&input).unwrap_err();
        assert_eq!(err.as_unexpected_attribute().unwrap().attribute, "x");
    }

    #[test]
    fn prohibited_attribute_among_ignored() {
        let ty = SchemaType::from(object_type([("a", numeric())]).reject(["x"]));
        assert!(ty.matches(&v(json!({"a": 123, "b": true}))));
        assert!(!ty.matches(&v(json!({"a": 123, "b": true, "x": []}))));
    }

    #[test]
    fn enum_picks_first_match() {
        let ty = enum_of([literal(1), literal(2)]);
        assert_eq!(ty.coerce(&v(json!(2))).unwrap(), v(json!(2)));
        let ty = enum_of([boolean(), number()]);
        assert_eq!(ty.coerce(&v(json!(false))).unwrap(), v(json!(false)));
        assert_eq!(ty.coerce(&v(json!(0))).unwrap(), v(json!(0)));
    }

    #[test]
    fn enum_backtracks_through_objects() {
        let ty = enum_of([
            object([("id", literal("id1")), ("value", string())]),
            object([("id", string()), ("value", atom())]),
        ]);
        assert_eq!(
            ty.coerce(&v(json!({"id": "id1", "value": "foo"}))).unwrap(),
            v(json!({"id": "id1", "value": "foo"}))
        );
        let second = ty.coerce(&v(json!({"id": "id2", "value": "foo"}))).unwrap();
        assert_eq!(second.get("value"), Some(&Value::Atom(Atom::new("foo"))));
        assert!(ty.coerce(&v(json!(2.5))).is_err());
    }

    #[test]
    fn enum_failure_names_the_enum() {
        let ty = enum_of([literal(1), literal(2)]).with_alias("one_or_two");
        let err = ty.coerce(&v(json!(3))).unwrap_err();
        let type_error = err.as_type_error().unwrap();
        assert_eq!(type_error.ty(), &ty);
        assert_eq!(type_error.ty().alias(), Some("one_or_two"));
        assert!(err.path().is_root());
    }

    #[test]
    fn enum_backtracks_over_unexpected_attributes() {
        let ty = enum_of([object([("a", number())]), object([("a", number()), ("b", number())])]);
        assert_eq!(
            ty.coerce(&v(json!({"a": 1, "b": 2}))).unwrap(),
            v(json!({"a": 1, "b": 2}))
        );
    }

    fn kind_detector() -> (SchemaType, SchemaType, Detector) {
        let with_email = object([("email", string())]);
        let with_address = SchemaType::from(object_type([("address", string())]).ignore_all());
        let (email, address) = (with_email.clone(), with_address.clone());
        let detector: Detector = Arc::new(move |value: &Value| {
            if value.get("email").is_some() {
                Some(email.clone())
            } else if value.get("address").is_some() {
                Some(address.clone())
            } else {
                None
            }
        });
        (with_email, with_address, detector)
    }

    #[test]
    fn detector_commits_to_branch() {
        let (email, address, detector) = kind_detector();
        let ty = enum_with_detector([address, email.clone()], detector);
        assert_eq!(
            ty.coerce(&v(json!({"email": "a@b"}))).unwrap(),
            v(json!({"email": "a@b"}))
        );

        // A scan would fail at the enum itself; the committed branch reports
        // its own field.
        let err = ty.coerce(&v(json!({"email": 3}))).unwrap_err();
        assert_eq!(err.path().to_string(), "$.email");
        assert_eq!(err.path().ty(), &string());

        // The address branch ignores unknown attributes and would accept
        // this value, but it is never tried.
        let err = ty.coerce(&v(json!({"email": "a@b", "address": "x"}))).unwrap_err();
        assert_eq!(err.as_unexpected_attribute().unwrap().attribute, "address");
        assert_eq!(err.path().to_string(), "$");
        assert_eq!(err.path().ty(), &email);
    }

    #[test]
    fn object_output_follows_field_order() {
        let ty = object([("zeta", number()), ("alpha", number())]);
        let out = ty.coerce(&v(json!({"alpha": 2, "zeta": 1}))).unwrap();
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"zeta":1,"alpha":2}"#);
        assert_eq!(out.to_json().to_string(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn detector_declining_falls_back_to_scan() {
        let (email, address, detector) = kind_detector();
        let ty = enum_with_detector([email, address, literal(0)], detector);
        assert_eq!(ty.coerce(&v(json!(0))).unwrap(), v(json!(0)));
        let err = ty.coerce(&v(json!(1))).unwrap_err();
        assert!(err.path().is_root());
        assert_eq!(err.path().ty(), &ty);
    }

    #[test]
    fn detector_outside_alternatives_is_ignored() {
        let detector: Detector = Arc::new(|_| Some(string()));
        let ty = enum_with_detector([number()], detector);
        assert_eq!(ty.coerce(&v(json!(4))).unwrap(), v(json!(4)));
    }

    #[test]
    fn coerce_json_converts_input() {
        let ty = object([("name", atom())]);
        let out = ty.coerce_json(&json!({"name": "x"})).unwrap();
        assert_eq!(out.to_json(), json!({"name": "x"}));
    }
}
