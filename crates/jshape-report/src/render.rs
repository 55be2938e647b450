//! # Diagnostic Renderer
//!
//! Turns the [`ErrorPath`] of a coercion error into two parts:
//!
//! 1. **Trace**: one line per path node from leaf to root, each indented
//!    one column deeper than the previous, naming the field or index that
//!    led there and the type expected.
//! 2. **Where legend**: the definition of every aliased type met on the
//!    way (plus the aliased alternatives of any enum on the path), each
//!    listed once and expanded one level.
//!
//! ```text
//!  "price" expected to be numeric
//!   0 expected to be item
//!    "items" expected to be items
//!     $ expected to be checkout
//!
//! Where:
//!   item = { "name": string, "count": numeric, "price": numeric }
//!   ...
//! ```

use std::collections::BTreeSet;
use std::fmt;

use jshape_core::value::quote;
use jshape_core::{CoerceError, ErrorPath, SchemaType, Step, TypeKind};

use crate::layout::Doc;
use crate::options::RenderOptions;

/// Build the layout document for a type. Aliased types print as their
/// alias unless `expand_alias` is set for this (top) level.
pub fn type_doc(ty: &SchemaType, expand_alias: bool) -> Doc {
    if !expand_alias {
        if let Some(alias) = ty.alias() {
            return Doc::text(alias);
        }
    }

    match ty.kind() {
        TypeKind::Base(base) => Doc::text(base.keyword()),
        TypeKind::Literal(value) => Doc::text(value.to_string()),
        TypeKind::Optional(inner) => wrapped("optional(", [inner]),
        TypeKind::Array(inner) => wrapped("array(", [inner]),
        TypeKind::Dictionary(inner) => wrapped("dictionary(", [inner]),
        TypeKind::Enum(e) => wrapped("enum(", e.alternatives()),
        TypeKind::Object(object) => {
            if object.fields().is_empty() {
                return Doc::text("{}");
            }
            let mut body = vec![Doc::breakable(" ")];
            for (i, (name, field)) in object.fields().iter().enumerate() {
                if i > 0 {
                    body.push(Doc::text(","));
                    body.push(Doc::breakable(" "));
                }
                body.push(Doc::text(format!("{}: ", quote(name))));
                body.push(type_doc(field, false));
            }
            Doc::group(Doc::concat(vec![
                Doc::text("{"),
                Doc::nest(2, Doc::concat(body)),
                Doc::breakable(" "),
                Doc::text("}"),
            ]))
        }
    }
}

fn wrapped<'a>(open: &str, items: impl IntoIterator<Item = &'a SchemaType>) -> Doc {
    let mut body = vec![Doc::breakable("")];
    for (i, ty) in items.into_iter().enumerate() {
        if i > 0 {
            body.push(Doc::text(","));
            body.push(Doc::breakable(" "));
        }
        body.push(type_doc(ty, false));
    }
    Doc::group(Doc::concat(vec![
        Doc::text(open),
        Doc::nest(2, Doc::concat(body)),
        Doc::breakable(""),
        Doc::text(")"),
    ]))
}

/// Single-line rendering used in trace lines.
pub fn pretty_str(ty: &SchemaType) -> String {
    type_doc(ty, false).render_flat()
}

/// `name = <definition>`, wrapped at `width`.
pub fn definition(name: &str, ty: &SchemaType, width: usize) -> String {
    Doc::concat(vec![
        Doc::text(name),
        Doc::text(" = "),
        Doc::group(type_doc(ty, true)),
    ])
    .render(width)
}

/// Renders the trace and legend for one error path.
#[derive(Debug, Clone)]
pub struct ErrorReporter<'a> {
    path: &'a ErrorPath,
    options: RenderOptions,
}

impl<'a> ErrorReporter<'a> {
    pub fn new(path: &'a ErrorPath) -> Self {
        Self {
            path,
            options: RenderOptions::default(),
        }
    }

    /// Report on the path carried by `error`.
    pub fn for_error(error: &'a CoerceError) -> Self {
        Self::new(error.path())
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Leaf-to-root trace, one newline-terminated line per node.
    pub fn trace(&self) -> String {
        let mut out = String::new();
        for (depth, node) in self.path.ancestors().enumerate() {
            out.extend(std::iter::repeat(' ').take(depth + 1));
            let ty = pretty_str(node.ty());
            let line = match node.parent() {
                Some((Step::Field(name), _)) => format!("{} expected to be {ty}", quote(name)),
                Some((Step::Index(index), _)) => format!("{index} expected to be {ty}"),
                Some((Step::Expand, _)) => format!("Expected to be {ty}"),
                None => format!("$ expected to be {ty}"),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Aliased types to define in the legend, each name once: the path's
    /// own types leaf to root, then the alternatives of enums on the path.
    pub fn aliased_types(&self) -> Vec<&'a SchemaType> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let mut visit = |ty: &'a SchemaType| {
            if let Some(alias) = ty.alias() {
                if seen.insert(alias) {
                    out.push(ty);
                }
            }
        };

        let path: &'a ErrorPath = self.path;
        for node in path.ancestors() {
            visit(node.ty());
        }
        for node in path.ancestors() {
            if let Some(e) = node.ty().as_enum() {
                e.alternatives().iter().for_each(&mut visit);
            }
        }
        out
    }

    /// Legend entries (`alias = ...`), unindented.
    pub fn legend(&self) -> Vec<String> {
        self.aliased_types()
            .into_iter()
            .filter_map(|ty| {
                ty.alias()
                    .map(|name| definition(name, ty, self.options.width))
            })
            .collect()
    }

    /// Full report: trace, then the `Where:` legend when any alias was met.
    pub fn render(&self) -> String {
        let mut out = self.trace();
        let legend = self.legend();
        if !legend.is_empty() {
            let pad = " ".repeat(self.options.legend_indent);
            let entries: Vec<String> = legend
                .iter()
                .flat_map(|entry| entry.lines())
                .map(|line| format!("{pad}{line}"))
                .collect();
            out.push_str("\nWhere:\n");
            out.push_str(&entries.join("\n"));
        }
        out
    }
}

impl fmt::Display for ErrorReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
