//! A minimal SQL fragment builder.
//!
//! Fragments are flat sequences of chunks that know nothing about
//! placeholder numbering until the whole statement is assembled, so the
//! same fragment can be spliced into a larger statement without
//! renumbering by hand. A fragment is just interleaved raw text and bound
//! parameters — there is no typed table/column model here, since the
//! caller's `SELECT` text is opaque to this crate.

use crate::dialect::Dialect;
use crate::value::Value;

/// One piece of a [`Sql`] fragment.
#[derive(Debug, Clone)]
enum Chunk {
    Raw(String),
    Param(Value),
}

/// A composable SQL fragment: interleaved raw text and bound parameter
/// values, dialect-agnostic until rendered with [`Sql::render`].
#[derive(Debug, Clone, Default)]
pub struct Sql {
    chunks: Vec<Chunk>,
}

impl Sql {
    /// An empty fragment.
    pub fn empty() -> Self {
        Self { chunks: Vec::new() }
    }

    /// A fragment holding a single piece of raw (already dialect-correct) text.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            chunks: vec![Chunk::Raw(text.into())],
        }
    }

    /// A fragment holding a single bound parameter, rendered as a
    /// dialect-appropriate placeholder at [`Sql::render`] time.
    pub fn param(value: Value) -> Self {
        Self {
            chunks: vec![Chunk::Param(value)],
        }
    }

    /// Appends `other`'s chunks onto `self`.
    pub fn append(mut self, other: Sql) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    /// Appends a raw text chunk.
    pub fn push_raw(self, text: impl Into<String>) -> Self {
        self.append(Sql::raw(text))
    }

    /// Wraps the fragment in parentheses.
    pub fn parens(self) -> Self {
        Sql::raw("(").append(self).push_raw(")")
    }

    /// Joins fragments with `separator` between each. Returns [`Sql::empty`]
    /// for an empty iterator.
    pub fn join(items: impl IntoIterator<Item = Sql>, separator: &str) -> Self {
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return Sql::empty();
        };
        let mut result = first;
        for item in iter {
            result = result.push_raw(separator).append(item);
        }
        result
    }

    /// `true` if this fragment carries no text and no parameters.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Renders the fragment to a SQL string for `dialect`, starting parameter
    /// numbering at `start_index` (1-based). Returns the rendered text and
    /// the index one past the last parameter consumed, so a caller splicing
    /// multiple fragments into one statement can keep numbering contiguous.
    pub fn render(&self, dialect: Dialect, start_index: usize) -> (String, usize) {
        let mut buf = String::new();
        let mut index = start_index;
        for chunk in &self.chunks {
            match chunk {
                Chunk::Raw(text) => buf.push_str(text),
                Chunk::Param(_) => {
                    buf.push_str(&dialect.render_placeholder(index));
                    index += 1;
                }
            }
        }
        (buf, index)
    }

    /// Iterates the bound parameter values in emission order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.chunks.iter().filter_map(|c| match c {
            Chunk::Param(v) => Some(v),
            Chunk::Raw(_) => None,
        })
    }
}

impl From<&str> for Sql {
    fn from(s: &str) -> Self {
        Sql::raw(s)
    }
}

impl From<Value> for Sql {
    fn from(v: Value) -> Self {
        Sql::param(v)
    }
}
