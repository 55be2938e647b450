//! # Line-Wrapping Layout
//!
//! A small group/nest/breakable document engine. A [`Doc::Group`] is laid
//! out on one line when it fits in the remaining width, counting the text
//! that follows it up to the next possible line break; otherwise each of its
//! own breakables becomes a newline at the current nesting. Outer groups are
//! decided before inner ones, so a broken group may still contain flat
//! children.

use std::iter;

/// A layout document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    Text(String),
    /// Newline plus indentation in a broken group, the given text otherwise.
    Breakable(&'static str),
    /// Increase the indentation of line breaks inside.
    Nest(usize, Box<Doc>),
    Group(Box<Doc>),
    Concat(Vec<Doc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

impl Doc {
    pub fn text(s: impl Into<String>) -> Self {
        Doc::Text(s.into())
    }

    pub fn breakable(flat: &'static str) -> Self {
        Doc::Breakable(flat)
    }

    pub fn nest(indent: usize, doc: Doc) -> Self {
        Doc::Nest(indent, Box::new(doc))
    }

    pub fn group(doc: Doc) -> Self {
        Doc::Group(Box::new(doc))
    }

    pub fn concat(docs: Vec<Doc>) -> Self {
        Doc::Concat(docs)
    }

    /// Lay out within `width` columns.
    pub fn render(&self, width: usize) -> String {
        let mut out = String::new();
        let mut column = 0usize;
        let mut stack: Vec<(usize, Mode, &Doc)> = vec![(0, Mode::Break, self)];

        while let Some((indent, mode, doc)) = stack.pop() {
            match doc {
                Doc::Text(s) => {
                    out.push_str(s);
                    column += s.chars().count();
                }
                Doc::Breakable(flat) => match mode {
                    Mode::Flat => {
                        out.push_str(flat);
                        column += flat.chars().count();
                    }
                    Mode::Break => {
                        out.push('\n');
                        out.extend(iter::repeat(' ').take(indent));
                        column = indent;
                    }
                },
                Doc::Nest(extra, inner) => stack.push((indent + extra, mode, inner)),
                Doc::Concat(docs) => stack.extend(docs.iter().rev().map(|d| (indent, mode, d))),
                Doc::Group(inner) => {
                    let remaining = width as isize - column as isize;
                    let mode = if mode == Mode::Flat || fits(remaining, inner, &stack) {
                        Mode::Flat
                    } else {
                        Mode::Break
                    };
                    stack.push((indent, mode, inner));
                }
            }
        }

        out
    }

    /// Lay out on a single line regardless of width.
    pub fn render_flat(&self) -> String {
        let mut out = String::new();
        self.write_flat(&mut out);
        out
    }

    fn write_flat(&self, out: &mut String) {
        match self {
            Doc::Text(s) => out.push_str(s),
            Doc::Breakable(flat) => out.push_str(flat),
            Doc::Nest(_, inner) | Doc::Group(inner) => inner.write_flat(out),
            Doc::Concat(docs) => docs.iter().for_each(|d| d.write_flat(out)),
        }
    }
}

/// Whether `group`, laid out flat, plus whatever follows it up to the next
/// line break, fits in `remaining` columns.
fn fits(mut remaining: isize, group: &Doc, rest: &[(usize, Mode, &Doc)]) -> bool {
    let mut pending: Vec<(Mode, &Doc)> = vec![(Mode::Flat, group)];
    let mut rest = rest.iter().rev();

    while remaining >= 0 {
        let (mode, doc) = match pending.pop() {
            Some(next) => next,
            None => match rest.next() {
                Some(&(_, mode, doc)) => (mode, doc),
                None => return true,
            },
        };
        match doc {
            Doc::Text(s) => remaining -= s.chars().count() as isize,
            Doc::Breakable(flat) => match mode {
                Mode::Flat => remaining -= flat.chars().count() as isize,
                Mode::Break => return true,
            },
            Doc::Nest(_, inner) | Doc::Group(inner) => pending.push((mode, inner)),
            Doc::Concat(docs) => pending.extend(docs.iter().rev().map(|d| (mode, d))),
        }
    }

    false
}
