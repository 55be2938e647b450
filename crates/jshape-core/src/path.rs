//! # Error Paths
//!
//! An [`ErrorPath`] records, for the position currently being coerced, the
//! type that was expected there and how the position was reached. Paths are
//! built root to leaf while descending and walked leaf to root when
//! reporting. Nodes are immutable and shared, so every error raised during
//! enum backtracking can hold on to a prefix of the same tree.

use std::fmt;
use std::sync::Arc;

use crate::types::SchemaType;

/// How a path node was reached from its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Object member (or dictionary key). Advances the position.
    Field(String),
    /// Array element. Advances the position.
    Index(usize),
    /// Same position, narrower expectation (optional unwrap, enum alternative).
    Expand,
}

#[derive(Debug)]
struct Node {
    ty: SchemaType,
    parent: Option<(Step, ErrorPath)>,
}

/// Immutable, parent-linked trace of expected types.
#[derive(Debug, Clone)]
pub struct ErrorPath(Arc<Node>);

impl ErrorPath {
    /// Start a path at the document root.
    pub fn root(ty: SchemaType) -> Self {
        Self(Arc::new(Node { ty, parent: None }))
    }

    fn child(&self, step: Step, ty: SchemaType) -> Self {
        Self(Arc::new(Node {
            ty,
            parent: Some((step, self.clone())),
        }))
    }

    /// Descend into object member `name`, expecting `ty`.
    pub fn dig_field(&self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.child(Step::Field(name.into()), ty)
    }

    /// Descend into array element `index`, expecting `ty`.
    pub fn dig_index(&self, index: usize, ty: SchemaType) -> Self {
        self.child(Step::Index(index), ty)
    }

    /// Stay at the same position, now expecting `ty`.
    pub fn expand(&self, ty: SchemaType) -> Self {
        self.child(Step::Expand, ty)
    }

    /// The type expected at this node.
    pub fn ty(&self) -> &SchemaType {
        &self.0.ty
    }

    /// The step from the parent and the parent itself; `None` at the root.
    pub fn parent(&self) -> Option<(&Step, &ErrorPath)> {
        self.0.parent.as_ref().map(|(step, path)| (step, path))
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Iterate nodes from this one up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of nodes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }
}

/// Leaf-to-root iterator over path nodes.
pub struct Ancestors<'a> {
    next: Option<&'a ErrorPath>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ErrorPath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent().map(|(_, parent)| parent);
        Some(current)
    }
}

impl fmt::Display for ErrorPath {
    /// JSON-path form: `$`, then `.name` per field and `[i]` per index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent() {
            None => f.write_str("$"),
            Some((step, parent)) => {
                write!(f, "{parent}")?;
                match step {
                    Step::Field(name) => write!(f, ".{name}"),
                    Step::Index(index) => write!(f, "[{index}]"),
                    Step::Expand => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BaseKind, EnumType, TypeKind};

    fn number() -> SchemaType {
        SchemaType::from(BaseKind::Number)
    }

    #[test]
    fn root_path() {
        let path = ErrorPath::root(SchemaType::from(BaseKind::String));
        assert!(path.parent().is_none());
        assert!(path.is_root());
        assert_eq!(path.to_string(), "$");
    }

    #[test]
    fn dug_path() {
        let arr = SchemaType::new(TypeKind::Array(number()));
        let path = ErrorPath::root(arr.clone())
            .dig_field("foo", arr)
            .dig_index(0, number());
        let (step, parent) = path.parent().unwrap();
        assert_eq!(step, &Step::Index(0));
        assert_eq!(parent.to_string(), "$.foo");
        assert_eq!(path.ty(), &number());
        assert_eq!(path.to_string(), "$.foo[0]");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn expanded_path_keeps_position() {
        let e = SchemaType::from(EnumType::new(vec![
            number(),
            SchemaType::from(BaseKind::String),
        ]));
        let path = ErrorPath::root(SchemaType::new(TypeKind::Array(e.clone())))
            .dig_index(0, e)
            .expand(SchemaType::from(BaseKind::String));
        assert_eq!(path.parent().unwrap().0, &Step::Expand);
        assert_eq!(path.ty(), &SchemaType::from(BaseKind::String));
        assert_eq!(path.to_string(), "$[0]");
    }

    #[test]
    fn siblings_share_prefix() {
        let root = ErrorPath::root(number());
        let a = root.dig_field("a", number());
        let b = root.dig_field("b", number());
        assert!(Arc::ptr_eq(&a.parent().unwrap().1 .0, &b.parent().unwrap().1 .0));
    }
}
