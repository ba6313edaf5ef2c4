//! Offset/limit pagination: runs a count query and a rows query against the
//! same filter/sort, and applies field exclusion to the returned rows.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::schema::{self, ModelSchema};
use crate::sort::{self, SorterRegistry};
use crate::sql::Sql;
use crate::value::Value;

/// A page request: `limit`/`offset` rather than a page number, so a caller
/// can express `limit = 0` (count only, no rows) and an arbitrary `offset`
/// independent of any fixed page size. `sorting` is the raw sort-token list
/// (defaults to primary-key ascending when empty, via [`sort::parse_tokens`]);
/// `excludes` is the list of dotted paths dropped from every returned row.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    pub limit: usize,
    pub offset: usize,
    pub sorting: Vec<String>,
    pub excludes: Vec<String>,
}

impl Paginator {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit,
            offset,
            sorting: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Builder-style attachment of sort tokens.
    pub fn sorting(mut self, sorting: Vec<String>) -> Self {
        self.sorting = sorting;
        self
    }

    /// Builder-style attachment of exclude paths.
    pub fn excluding(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }
}

/// One page of results plus the total row count across all pages (ignoring
/// `LIMIT`/`OFFSET`, the same `WHERE` clause).
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<serde_json::Value>,
    pub total: i64,
    pub limit: usize,
    pub offset: usize,
}

/// The execution seam a backend plugs into: runs a rendered statement and
/// its bound parameters, returning either a single count or a set of rows
/// shaped as JSON objects.
pub trait QueryExecutor {
    fn count(&self, sql: &str, params: &[Value]) -> Result<i64>;
    fn rows(&self, sql: &str, params: &[Value]) -> Result<Vec<serde_json::Value>>;
}

/// Runs one page of `model` against `where_clause` plus `paginator`'s sort
/// and limit/offset settings, executing through `executor`, then applies
/// `paginator.excludes` to every returned row.
///
/// Each sort key parsed from `paginator.sorting` contributes a
/// `field IS NOT NULL` guard ([`sort::null_guard`]); these are AND-combined
/// with `where_clause` into one effective `WHERE` before either statement is
/// built. When `paginator.limit` is `0` the rows statement is never built or
/// executed — `items` comes back empty, but `total` is still computed.
pub fn run(
    model: &ModelSchema,
    dialect: Dialect,
    where_clause: Option<&Sql>,
    sorter: &SorterRegistry,
    paginator: &Paginator,
    executor: &dyn QueryExecutor,
) -> Result<Page> {
    let keys = sort::parse_tokens(model, &paginator.sorting)?;
    let order_by = sorter.compile(dialect, &keys);

    let mut guards: Vec<Sql> = where_clause.cloned().into_iter().collect();
    guards.extend(sort::null_guards(&keys));
    let effective_where = if guards.is_empty() {
        None
    } else {
        Some(Sql::join(guards, " AND "))
    };

    let mut count_sql = Sql::raw(format!("SELECT COUNT({}) FROM {}", model.pk, model.table));
    if let Some(w) = &effective_where {
        count_sql = count_sql.push_raw(" WHERE ").append(w.clone());
    }
    let (count_text, _) = count_sql.render(dialect, 1);
    let count_params: Vec<Value> = count_sql.params().cloned().collect();
    let total = executor.count(&count_text, &count_params)?;

    let mut items = if paginator.limit == 0 {
        Vec::new()
    } else {
        let mut rows_sql = Sql::raw(format!("SELECT * FROM {}", model.table));
        if let Some(w) = &effective_where {
            rows_sql = rows_sql.push_raw(" WHERE ").append(w.clone());
        }
        if !order_by.is_empty() {
            rows_sql = rows_sql.push_raw(" ORDER BY ").append(order_by.clone());
        }
        rows_sql = rows_sql
            .push_raw(" LIMIT ")
            .append(Sql::param(Value::Int(paginator.limit as i64)))
            .push_raw(" OFFSET ")
            .append(Sql::param(Value::Int(paginator.offset as i64)));

        let (rows_text, _) = rows_sql.render(dialect, 1);
        let rows_params: Vec<Value> = rows_sql.params().cloned().collect();
        crate::sift_trace_query!(rows_text, rows_params.len());
        executor.rows(&rows_text, &rows_params)?
    };

    for item in &mut items {
        if let Some(obj) = item.as_object_mut() {
            for path in &paginator.excludes {
                apply_exclude(model, obj, path);
            }
        }
    }

    Ok(Page {
        items,
        total,
        limit: paginator.limit,
        offset: paginator.offset,
    })
}

fn apply_exclude(model: &ModelSchema, row: &mut serde_json::Map<String, serde_json::Value>, path: &str) {
    let Some((root, children)) = schema::resolve(model, path) else {
        return;
    };

    if children.is_empty() {
        row.insert(root.name.to_string(), serde_json::Value::Null);
        return;
    }

    let Some(nested) = root.schema.nested.as_ref() else {
        return;
    };

    let Some(doc) = row.get_mut(root.name).and_then(|v| v.as_object_mut()) else {
        return;
    };

    let mut cursor = doc;
    for segment in &children[..children.len() - 1] {
        let Some(next) = cursor.get_mut(segment).and_then(|v| v.as_object_mut()) else {
            return;
        };
        cursor = next;
    }

    let last = children.last().expect("children non-empty");
    if nested.is_open() {
        cursor.remove(last);
    } else if nested.declares(last) {
        cursor.insert(last.clone(), serde_json::Value::Null);
    }
    // An undeclared key in a strict nested record isn't a valid exclude
    // path; left untouched rather than inserting a key the schema never
    // claimed.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ColumnType;
    use crate::schema::{FieldKind, FieldSchema, NestedSchema};

    fn person_schema() -> ModelSchema {
        ModelSchema::new("person", "id")
            .field("name", FieldSchema::scalar(FieldKind::String, ColumnType::Text))
            .field("jsonable", FieldSchema::json(ColumnType::Text, NestedSchema::Open))
            .field(
                "nestable",
                FieldSchema::json(
                    ColumnType::Text,
                    NestedSchema::Strict(std::collections::BTreeMap::from([("secret", FieldKind::String)])),
                ),
            )
    }

    #[test]
    fn excluding_root_field_nulls_it() {
        let model = person_schema();
        let mut row = serde_json::json!({"id": 1, "name": "Ada"});
        let obj = row.as_object_mut().unwrap();
        apply_exclude(&model, obj, "name");
        assert_eq!(row["name"], serde_json::Value::Null);
    }

    #[test]
    fn excluding_open_nested_key_removes_it() {
        let model = person_schema();
        let mut row = serde_json::json!({"id": 1, "jsonable": {"age": 30, "nickname": "Ace"}});
        let obj = row.as_object_mut().unwrap();
        apply_exclude(&model, obj, "jsonable.nickname");
        assert!(!row["jsonable"].as_object().unwrap().contains_key("nickname"));
        assert!(row["jsonable"].as_object().unwrap().contains_key("age"));
    }

    #[test]
    fn excluding_strict_nested_key_nulls_it_but_keeps_key() {
        let model = person_schema();
        let mut row = serde_json::json!({"id": 1, "nestable": {"secret": "shh"}});
        let obj = row.as_object_mut().unwrap();
        apply_exclude(&model, obj, "nestable.secret");
        assert!(row["nestable"].as_object().unwrap().contains_key("secret"));
        assert_eq!(row["nestable"]["secret"], serde_json::Value::Null);
    }

    #[test]
    fn excluding_undeclared_strict_nested_key_is_ignored() {
        let model = person_schema();
        let mut row = serde_json::json!({"id": 1, "nestable": {"secret": "shh"}});
        let obj = row.as_object_mut().unwrap();
        apply_exclude(&model, obj, "nestable.bogus");
        let nestable = row["nestable"].as_object().unwrap();
        assert!(!nestable.contains_key("bogus"));
        assert_eq!(nestable["secret"], "shh");
    }

    #[test]
    fn paginator_new_carries_limit_and_offset_unclamped() {
        let p = Paginator::new(0, 50);
        assert_eq!(p.limit, 0);
        assert_eq!(p.offset, 50);
        assert!(p.sorting.is_empty());
        assert!(p.excludes.is_empty());
    }

    #[test]
    fn paginator_builders_attach_sorting_and_excludes() {
        let p = Paginator::new(10, 0)
            .sorting(vec!["age:desc".to_string()])
            .excluding(vec!["name".to_string()]);
        assert_eq!(p.sorting, vec!["age:desc".to_string()]);
        assert_eq!(p.excludes, vec!["name".to_string()]);
    }
}
