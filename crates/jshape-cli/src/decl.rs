//! # Declaration Files
//!
//! Loads a mapping of `name → type expression` from YAML (or JSON, which
//! parses as YAML) and binds every name in a [`Namespace`].
//!
//! ```yaml
//! item:
//!   object: { name: string, count: numeric, price: numeric }
//! items:
//!   array: item
//! checkout:
//!   object:
//!     items: items
//!     change: number?
//!     type: { enum: [ { literal: 1 }, atom ] }
//! ```
//!
//! A scalar expression is a base keyword or a declared name; a trailing `?`
//! makes it optional. A mapping expression has exactly one constructor key.
//! `object` mappings may also carry `ignore:` or `reject:` with `all`, a
//! list of names, or `{ except: [names] }`.
//!
//! Names may be used before they are declared. A name that (directly or
//! through other names) refers to itself is rejected.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value as Yaml};
use thiserror::Error;

use jshape_core::builder::{array, dictionary, enum_of, literal, object_type, optional};
use jshape_core::{BaseKind, Namespace, NamespaceError, ObjectType, SchemaType, Value};

/// Errors in a declaration document.
#[derive(Error, Debug)]
pub enum DeclError {
    #[error("invalid declaration document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("declaration document must be a mapping of type names to expressions")]
    NotAMapping,

    #[error("type names must be strings, found {0:?}")]
    InvalidName(Yaml),

    #[error("in '{owner}': unknown type '{reference}'")]
    UnknownType { owner: String, reference: String },

    #[error("in '{owner}': unknown constructor '{key}'")]
    UnknownConstructor { owner: String, key: String },

    #[error("in '{owner}': {message}")]
    Malformed { owner: String, message: String },

    #[error("reference cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}

const CONSTRUCTORS: &[&str] = &["optional", "array", "dictionary", "literal", "enum", "object"];

/// Parse and resolve a declaration document.
pub fn parse_declarations(source: &str) -> Result<Namespace, DeclError> {
    let document: Yaml = serde_yaml::from_str(source)?;
    let mapping = match document {
        Yaml::Mapping(mapping) => mapping,
        Yaml::Null => Mapping::new(),
        _ => return Err(DeclError::NotAMapping),
    };

    let mut exprs = Vec::with_capacity(mapping.len());
    for (key, expr) in &mapping {
        match key {
            Yaml::String(name) => exprs.push((name.as_str(), expr)),
            other => return Err(DeclError::InvalidName(other.clone())),
        }
    }

    let mut resolver = Resolver {
        exprs: exprs.iter().copied().collect(),
        resolved: HashMap::new(),
        in_progress: Vec::new(),
    };

    let mut namespace = Namespace::new();
    for &(name, _) in &exprs {
        let ty = resolver.resolve(name)?;
        namespace.define(name, ty)?;
    }
    tracing::debug!(types = namespace.len(), "resolved declarations");
    Ok(namespace)
}

struct Resolver<'a> {
    exprs: HashMap<&'a str, &'a Yaml>,
    resolved: HashMap<&'a str, SchemaType>,
    /// Names currently being resolved, outermost first.
    in_progress: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    /// Resolve a declared name to its aliased schema.
    fn resolve(&mut self, name: &'a str) -> Result<SchemaType, DeclError> {
        if let Some(ty) = self.resolved.get(name) {
            return Ok(ty.clone());
        }
        if let Some(start) = self.in_progress.iter().position(|n| *n == name) {
            let mut cycle: Vec<String> = self.in_progress[start..]
                .iter()
                .map(|n| n.to_string())
                .collect();
            cycle.push(name.to_string());
            return Err(DeclError::Cycle(cycle));
        }

        let Some(&expr) = self.exprs.get(name) else {
            // Callers check membership first.
            return Err(DeclError::UnknownType {
                owner: name.to_string(),
                reference: name.to_string(),
            });
        };

        self.in_progress.push(name);
        let built = self.build(name, expr);
        self.in_progress.pop();

        let ty = built?.with_alias(name);
        self.resolved.insert(name, ty.clone());
        Ok(ty)
    }

    fn build(&mut self, owner: &'a str, expr: &'a Yaml) -> Result<SchemaType, DeclError> {
        match expr {
            Yaml::String(s) => self.build_scalar(owner, s),
            Yaml::Mapping(mapping) => self.build_constructor(owner, mapping),
            other => Err(malformed(
                owner,
                format!("expected a type name or constructor mapping, found {}", describe(other)),
            )),
        }
    }

    fn build_scalar(&mut self, owner: &'a str, s: &'a str) -> Result<SchemaType, DeclError> {
        let (name, is_optional) = match s.strip_suffix('?') {
            Some(name) => (name, true),
            None => (s, false),
        };
        let ty = if let Some(base) = BaseKind::from_keyword(name) {
            SchemaType::from(base)
        } else if self.exprs.contains_key(name) {
            self.resolve(name)?
        } else {
            return Err(DeclError::UnknownType {
                owner: owner.to_string(),
                reference: name.to_string(),
            });
        };
        Ok(if is_optional { optional(ty) } else { ty })
    }

    fn build_constructor(
        &mut self,
        owner: &'a str,
        mapping: &'a Mapping,
    ) -> Result<SchemaType, DeclError> {
        let mut constructor = None;
        let mut ignore = None;
        let mut reject = None;

        for (key, value) in mapping {
            let Yaml::String(key) = key else {
                return Err(malformed(owner, format!("constructor keys must be strings, found {}", describe(key))));
            };
            match key.as_str() {
                "ignore" => ignore = Some(value),
                "reject" => reject = Some(value),
                k if CONSTRUCTORS.contains(&k) => {
                    if constructor.is_some() {
                        return Err(malformed(owner, "a type expression takes exactly one constructor"));
                    }
                    constructor = Some((k, value));
                }
                _ => {
                    return Err(DeclError::UnknownConstructor {
                        owner: owner.to_string(),
                        key: key.clone(),
                    })
                }
            }
        }

        let Some((key, arg)) = constructor else {
            return Err(malformed(owner, "missing constructor key"));
        };
        if key != "object" && (ignore.is_some() || reject.is_some()) {
            return Err(malformed(owner, "ignore/reject apply to object only"));
        }

        match key {
            "optional" => Ok(optional(self.build(owner, arg)?)),
            "array" => Ok(array(self.build(owner, arg)?)),
            "dictionary" => Ok(dictionary(self.build(owner, arg)?)),
            "literal" => {
                let json = serde_json::to_value(arg)
                    .map_err(|e| malformed(owner, format!("literal is not JSON-representable: {e}")))?;
                Ok(literal(Value::from(json)))
            }
            "enum" => {
                let Yaml::Sequence(items) = arg else {
                    return Err(malformed(owner, "enum expects a list of alternatives"));
                };
                let alternatives = items
                    .iter()
                    .map(|item| self.build(owner, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(enum_of(alternatives))
            }
            _ => {
                let object = self.build_object(owner, arg)?;
                let object = match (ignore, reject) {
                    (Some(_), Some(_)) => {
                        return Err(malformed(owner, "ignore and reject are mutually exclusive"))
                    }
                    (Some(policy), None) => apply_policy(owner, &object, policy, Policy::Ignore)?,
                    (None, Some(policy)) => apply_policy(owner, &object, policy, Policy::Reject)?,
                    (None, None) => object,
                };
                Ok(object.into())
            }
        }
    }

    fn build_object(&mut self, owner: &'a str, arg: &'a Yaml) -> Result<ObjectType, DeclError> {
        let fields = match arg {
            Yaml::Mapping(fields) => fields,
            Yaml::Null => return Ok(object_type(Vec::<(String, SchemaType)>::new())),
            other => {
                return Err(malformed(
                    owner,
                    format!("object expects a mapping of fields, found {}", describe(other)),
                ))
            }
        };
        let mut built = Vec::with_capacity(fields.len());
        for (field, expr) in fields {
            let Yaml::String(field) = field else {
                return Err(malformed(owner, format!("field names must be strings, found {}", describe(field))));
            };
            built.push((field.as_str(), self.build(owner, expr)?));
        }
        Ok(object_type(built))
    }
}

#[derive(Clone, Copy)]
enum Policy {
    Ignore,
    Reject,
}

fn apply_policy(
    owner: &str,
    object: &ObjectType,
    setting: &Yaml,
    policy: Policy,
) -> Result<ObjectType, DeclError> {
    match setting {
        Yaml::String(all) if all == "all" => Ok(match policy {
            Policy::Ignore => object.ignore_all(),
            Policy::Reject => object.reject_all(),
        }),
        Yaml::Sequence(_) => {
            let names = string_list(owner, setting)?;
            Ok(match policy {
                Policy::Ignore => object.ignore(names),
                Policy::Reject => object.reject(names),
            })
        }
        Yaml::Mapping(mapping) if mapping.len() == 1 => {
            let Some(except) = mapping.get("except") else {
                return Err(malformed(owner, "expected `all`, a list of names, or `{ except: [...] }`"));
            };
            let names = string_list(owner, except)?;
            Ok(match policy {
                Policy::Ignore => object.ignore_except(names),
                Policy::Reject => object.reject_except(names),
            })
        }
        _ => Err(malformed(owner, "expected `all`, a list of names, or `{ except: [...] }`")),
    }
}

fn string_list(owner: &str, value: &Yaml) -> Result<Vec<String>, DeclError> {
    let Yaml::Sequence(items) = value else {
        return Err(malformed(owner, "expected a list of attribute names"));
    };
    items
        .iter()
        .map(|item| match item {
            Yaml::String(s) => Ok(s.clone()),
            other => Err(malformed(owner, format!("attribute names must be strings, found {}", describe(other)))),
        })
        .collect()
}

fn malformed(owner: &str, message: impl Into<String>) -> DeclError {
    DeclError::Malformed {
        owner: owner.to_string(),
        message: message.into(),
    }
}

fn describe(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a list",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}
