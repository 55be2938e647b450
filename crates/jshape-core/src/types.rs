//! # Type Algebra
//!
//! [`SchemaType`] is the closed set of schema shapes. Each value is an
//! immutable, cheaply clonable handle: the shape lives behind an `Arc` and
//! the optional display alias sits beside it, so aliasing produces a new
//! handle without touching the shared body.
//!
//! ## Equality
//!
//! `PartialEq` is structural and ignores aliases at every depth. Enum
//! detectors are compared by identity, since functions have no structure.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::value::{quote, Value};

/// Primitive schema kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Any,
    String,
    Number,
    Integer,
    Boolean,
    /// A number, or a string spelled like one (`"-1.5"`).
    Numeric,
    /// A string or atom, normalized to an atom.
    Atom,
}

fn numeric_string() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?[0-9.]+$").expect("numeric pattern is valid"))
}

impl BaseKind {
    /// The keyword used for this kind in rendered diagnostics.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseKind::Any => "any",
            BaseKind::String => "string",
            BaseKind::Number => "number",
            BaseKind::Integer => "integer",
            BaseKind::Boolean => "boolean",
            BaseKind::Numeric => "numeric",
            BaseKind::Atom => "atom",
        }
    }

    /// Parse a keyword back into a kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "any" => BaseKind::Any,
            "string" => BaseKind::String,
            "number" => BaseKind::Number,
            "integer" => BaseKind::Integer,
            "boolean" => BaseKind::Boolean,
            "numeric" => BaseKind::Numeric,
            "atom" => BaseKind::Atom,
            _ => return None,
        })
    }

    /// Apply the kind's predicate.
    pub fn test(self, value: &Value) -> bool {
        match self {
            BaseKind::Any => true,
            BaseKind::String => matches!(value, Value::String(_)),
            BaseKind::Number => matches!(value, Value::Number(_)),
            BaseKind::Integer => {
                matches!(value, Value::Number(n) if n.is_i64() || n.is_u64())
            }
            BaseKind::Boolean => matches!(value, Value::Bool(_)),
            BaseKind::Numeric => match value {
                Value::Number(_) => true,
                Value::String(s) => numeric_string().is_match(s),
                _ => false,
            },
            BaseKind::Atom => matches!(value, Value::String(_) | Value::Atom(_)),
        }
    }
}

/// Ordered field declarations of an object schema.
///
/// Insertion keeps declaration order; inserting an existing name replaces
/// its schema in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, SchemaType)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field. Returns the previous schema, if any.
    pub fn insert(&mut self, name: impl Into<String>, ty: impl Into<SchemaType>) -> Option<SchemaType> {
        let name = name.into();
        let ty = ty.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, ty)),
            None => {
                self.entries.push((name, ty));
                None
            }
        }
    }

    /// Remove a field, returning its schema.
    pub fn remove(&mut self, name: &str) -> Option<SchemaType> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, t)| t)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaType)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }
}

impl<K: Into<String>, T: Into<SchemaType>> FromIterator<(K, T)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut fields = FieldMap::new();
        for (name, ty) in iter {
            fields.insert(name, ty);
        }
        fields
    }
}

/// What an object schema does with attributes it does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownPolicy {
    /// Unknown attributes are errors, except those in `exceptions`, which are dropped.
    Reject,
    /// Unknown attributes are dropped, except those in `exceptions`, which are errors.
    Ignore,
}

/// Object schema: declared fields plus the unknown-attribute policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    fields: FieldMap,
    unknown: UnknownPolicy,
    exceptions: BTreeSet<String>,
}

fn name_set<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

impl ObjectType {
    /// Create an object schema with an explicit policy.
    pub fn new(fields: FieldMap, unknown: UnknownPolicy, exceptions: BTreeSet<String>) -> Self {
        Self {
            fields,
            unknown,
            exceptions,
        }
    }

    /// Create an object schema with the default policy: an empty schema
    /// ignores every attribute, a non-empty one rejects unknown attributes.
    pub fn with_fields(fields: FieldMap) -> Self {
        let unknown = if fields.is_empty() {
            UnknownPolicy::Ignore
        } else {
            UnknownPolicy::Reject
        };
        Self::new(fields, unknown, BTreeSet::new())
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn unknown_policy(&self) -> UnknownPolicy {
        self.unknown
    }

    pub fn exceptions(&self) -> &BTreeSet<String> {
        &self.exceptions
    }

    /// Whether an undeclared attribute named `name` is an error.
    pub fn rejects(&self, name: &str) -> bool {
        let excepted = self.exceptions.contains(name);
        match self.unknown {
            UnknownPolicy::Reject => !excepted,
            UnknownPolicy::Ignore => excepted,
        }
    }

    fn with_policy(&self, unknown: UnknownPolicy, exceptions: BTreeSet<String>) -> Self {
        Self::new(self.fields.clone(), unknown, exceptions)
    }

    /// Drop every unknown attribute.
    pub fn ignore_all(&self) -> Self {
        self.with_policy(UnknownPolicy::Ignore, BTreeSet::new())
    }

    /// Drop exactly these unknown attributes; reject any other.
    pub fn ignore<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_policy(UnknownPolicy::Reject, name_set(names))
    }

    /// Drop every unknown attribute except these, which are rejected.
    pub fn ignore_except<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_policy(UnknownPolicy::Ignore, name_set(names))
    }

    /// Reject every unknown attribute.
    pub fn reject_all(&self) -> Self {
        self.with_policy(UnknownPolicy::Reject, BTreeSet::new())
    }

    /// Reject exactly these unknown attributes; drop any other.
    pub fn reject<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_policy(UnknownPolicy::Ignore, name_set(names))
    }

    /// Reject every unknown attribute except these, which are dropped.
    pub fn reject_except<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_policy(UnknownPolicy::Reject, name_set(names))
    }

    /// Add or overwrite fields, keeping the policy.
    pub fn merge<I, K, T>(&self, more: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<SchemaType>,
    {
        self.update_fields(|fields| {
            for (name, ty) in more {
                fields.insert(name, ty);
            }
        })
    }

    /// Edit a copy of the field map, keeping the policy.
    pub fn update_fields(&self, mutate: impl FnOnce(&mut FieldMap)) -> Self {
        let mut fields = self.fields.clone();
        mutate(&mut fields);
        Self::new(fields, self.unknown, self.exceptions.clone())
    }

    /// Remove the named fields.
    pub fn except<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update_fields(|fields| {
            for name in names {
                fields.remove(name.as_ref());
            }
        })
    }
}

/// Picks an enum alternative from the shape of a value.
pub type Detector = Arc<dyn Fn(&Value) -> Option<SchemaType> + Send + Sync>;

/// Enum schema: ordered alternatives and an optional detector.
#[derive(Clone)]
pub struct EnumType {
    alternatives: Vec<SchemaType>,
    detector: Option<Detector>,
}

impl EnumType {
    pub fn new(alternatives: Vec<SchemaType>) -> Self {
        Self {
            alternatives,
            detector: None,
        }
    }

    pub fn with_detector(alternatives: Vec<SchemaType>, detector: Detector) -> Self {
        Self {
            alternatives,
            detector: Some(detector),
        }
    }

    pub fn alternatives(&self) -> &[SchemaType] {
        &self.alternatives
    }

    pub fn detector(&self) -> Option<&Detector> {
        self.detector.as_ref()
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("alternatives", &self.alternatives)
            .field("detector", &self.detector.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        let same_detector = match (&self.detector, &other.detector) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_detector && self.alternatives == other.alternatives
    }
}

/// The shape of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Base(BaseKind),
    Optional(SchemaType),
    Literal(Value),
    Array(SchemaType),
    Dictionary(SchemaType),
    Object(ObjectType),
    Enum(EnumType),
}

/// A schema value: a shared shape plus an optional display alias.
#[derive(Debug, Clone)]
pub struct SchemaType {
    kind: Arc<TypeKind>,
    alias: Option<Arc<str>>,
}

impl SchemaType {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind: Arc::new(kind),
            alias: None,
        }
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// The display alias, if one is bound.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Return a copy of this schema carrying `name` as its alias.
    ///
    /// The body is shared with the receiver, which keeps its own alias.
    #[must_use]
    pub fn with_alias(&self, name: impl AsRef<str>) -> Self {
        Self {
            kind: Arc::clone(&self.kind),
            alias: Some(Arc::from(name.as_ref())),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self.kind() {
            TypeKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self.kind() {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.kind(), TypeKind::Optional(_))
    }

    /// Write the structural form, rendering nested aliased types by name.
    pub fn fmt_structure(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TypeKind::Base(base) => f.write_str(base.keyword()),
            TypeKind::Literal(value) => write!(f, "{value}"),
            TypeKind::Optional(inner) => write!(f, "optional({inner})"),
            TypeKind::Array(inner) => write!(f, "array({inner})"),
            TypeKind::Dictionary(inner) => write!(f, "dictionary({inner})"),
            TypeKind::Enum(e) => {
                f.write_str("enum(")?;
                for (i, alt) in e.alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str(")")
            }
            TypeKind::Object(object) => {
                if object.fields.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, (name, ty)) in object.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {ty}", quote(name))?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl PartialEq for SchemaType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind) || self.kind == other.kind
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alias() {
            Some(alias) => f.write_str(alias),
            None => self.fmt_structure(f),
        }
    }
}

impl From<TypeKind> for SchemaType {
    fn from(kind: TypeKind) -> Self {
        SchemaType::new(kind)
    }
}

impl From<BaseKind> for SchemaType {
    fn from(base: BaseKind) -> Self {
        SchemaType::new(TypeKind::Base(base))
    }
}

impl From<ObjectType> for SchemaType {
    fn from(object: ObjectType) -> Self {
        SchemaType::new(TypeKind::Object(object))
    }
}

impl From<EnumType> for SchemaType {
    fn from(e: EnumType) -> Self {
        SchemaType::new(TypeKind::Enum(e))
    }
}
