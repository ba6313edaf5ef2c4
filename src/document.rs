//! The filter-set binder: turns a whole filter document into one combined
//! `WHERE` fragment against a model.
//!
//! A filter document is an ordered list of `(dotted path, leaf filter)`
//! pairs rather than a `serde_json::Value` object: `serde_json::Map`'s
//! default backing store does not preserve insertion order, and document
//! order is observable here (it determines predicate emission order in the
//! combined `AND` chain), so callers hand in order explicitly.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::filter;
use crate::schema::{self, ModelSchema};
use crate::sql::Sql;

/// An ordered filter document: each entry is a dotted field path paired with
/// its leaf filter object, in the order the caller wants predicates emitted.
#[cfg(feature = "serde")]
pub type FilterDocument = Vec<(String, serde_json::Value)>;

/// The result of binding a filter document against a model: the combined
/// `WHERE` fragment (`None` if the document named no resolvable field) plus
/// the document it was built from, carried alongside rather than consumed,
/// so a caller can report which filters were applied to a result page.
#[derive(Debug, Clone)]
pub struct BoundFilters {
    pub where_clause: Option<Sql>,
    #[cfg(feature = "serde")]
    pub document: FilterDocument,
}

/// Binds every entry of `document` against `model`, compiling each
/// resolvable path into a predicate and AND-combining them in document
/// order.
///
/// An entry whose head path segment does not name a field of `model` is
/// silently skipped — not an error — mirroring [`schema::resolve`]'s
/// control-flow contract. This makes the binder forgiving of stray keys a
/// caller's UI might submit for fields the caller has since removed.
#[cfg(feature = "serde")]
pub fn bind_filters(model: &ModelSchema, dialect: Dialect, document: FilterDocument) -> Result<BoundFilters> {
    let mut predicates = Vec::with_capacity(document.len());

    for (path, leaf_json) in &document {
        let Some((root, children)) = schema::resolve(model, path) else {
            crate::sift_trace_skipped_field!(path);
            continue;
        };

        let leaf = filter::parse_leaf(leaf_json)?;
        let predicate = filter::compile(dialect, root.name, root.schema.column_type, &children, &leaf)?;
        predicates.push(predicate);
    }

    let where_clause = if predicates.is_empty() {
        None
    } else {
        let combined = Sql::join(predicates, " AND ");
        let (text, _) = combined.render(dialect, 1);
        crate::sift_trace_query!(text, combined.params().count());
        Some(combined)
    };

    Ok(BoundFilters {
        where_clause,
        document,
    })
}
