//! # Namespaces
//!
//! A [`Namespace`] binds names to schemas. Every lookup hands back the schema
//! carrying its name as alias, so diagnostics print `item` instead of the
//! full structure and list the definition in their legend.

use crate::error::NamespaceError;
use crate::types::SchemaType;

/// Named schema declarations, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: Vec<SchemaType>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `ty` and return the aliased schema.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::Duplicate`] if `name` is already bound and
    /// [`NamespaceError::EmptyName`] for an empty name.
    pub fn define(
        &mut self,
        name: impl AsRef<str>,
        ty: impl Into<SchemaType>,
    ) -> Result<SchemaType, NamespaceError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(NamespaceError::EmptyName);
        }
        if self.contains(name) {
            return Err(NamespaceError::Duplicate(name.to_string()));
        }
        let aliased = ty.into().with_alias(name);
        self.entries.push(aliased.clone());
        Ok(aliased)
    }

    /// The aliased schema bound to `name`.
    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.entries.iter().find(|ty| ty.alias() == Some(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bound names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(SchemaType::alias)
    }

    /// Aliased schemas in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
