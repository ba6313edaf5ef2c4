//! The filter compiler: turns one leaf filter (`{"$gt": 5}`, `{"$in": [...]}`,
//! ...) into a total boolean SQL expression for a resolved column/path.
//!
//! Every compiled predicate is total by construction: a type mismatch
//! between the comparable and the column's actual content never raises at
//! execution time, it evaluates to SQL `FALSE`.

use crate::caster;
use crate::dialect::Dialect;
use crate::error::{Result, SiftError};
use crate::guard;
use crate::registry::{self, ColumnType};
use crate::sql::Sql;
use crate::value::{homogeneous_kind, Kind, Value};

/// A parsed leaf filter: one operator and its argument(s).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterLeaf {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Lt(Value),
    Between { lower: Value, upper: Value },
    In(Vec<Value>),
    Nin(Vec<Value>),
    Like(String),
    Unlike(String),
    Has(bool),
}

impl FilterLeaf {
    /// The comparable kind this leaf tests against, or `None` when the leaf
    /// carries no kind of its own: `$has` tests presence, not type, and an
    /// empty `$in`/`$nin` list has no element to infer a kind from.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            FilterLeaf::Eq(v) | FilterLeaf::Ne(v) | FilterLeaf::Gt(v) | FilterLeaf::Lt(v) => {
                Some(v.kind())
            }
            FilterLeaf::Between { lower, .. } => Some(lower.kind()),
            FilterLeaf::In(values) | FilterLeaf::Nin(values) => values.first().map(Value::kind),
            FilterLeaf::Like(_) | FilterLeaf::Unlike(_) => Some(Kind::String),
            FilterLeaf::Has(_) => None,
        }
    }
}

#[cfg(feature = "serde")]
fn scalar_arg(op: &str, json: &serde_json::Value) -> Result<Value> {
    Value::from_json(json).ok_or_else(|| {
        SiftError::InvalidFilterSyntax(format!("{op} requires a scalar bool/number/string argument"))
    })
}

#[cfg(feature = "serde")]
fn list_arg(op: &str, json: &serde_json::Value) -> Result<Vec<Value>> {
    let arr = json
        .as_array()
        .ok_or_else(|| SiftError::InvalidFilterSyntax(format!("{op} requires an array argument")))?;
    let values = arr
        .iter()
        .map(|v| scalar_arg(op, v))
        .collect::<Result<Vec<_>>>()?;
    homogeneous_kind(&values)?;
    Ok(values)
}

#[cfg(feature = "serde")]
fn string_arg(op: &str, json: &serde_json::Value) -> Result<String> {
    json.as_str()
        .map(str::to_string)
        .ok_or_else(|| SiftError::InvalidFilterSyntax(format!("{op} requires a string argument")))
}

#[cfg(feature = "serde")]
fn bool_arg(op: &str, json: &serde_json::Value) -> Result<bool> {
    json.as_bool()
        .ok_or_else(|| SiftError::InvalidFilterSyntax(format!("{op} requires a boolean argument")))
}

/// Parses one filter leaf object, e.g. `{"$gt": 5}` or `{"$gt": 0, "$lt": 10}`.
///
/// `$gt` and `$lt` co-occurring in the same object is the one case that
/// accepts two keys, and collapses to [`FilterLeaf::Between`]; every other
/// leaf requires exactly one recognized key. An unrecognized key, a missing
/// key, or a mis-typed argument is [`SiftError::InvalidFilterSyntax`].
#[cfg(feature = "serde")]
pub fn parse_leaf(json: &serde_json::Value) -> Result<FilterLeaf> {
    let obj = json
        .as_object()
        .ok_or_else(|| SiftError::InvalidFilterSyntax("a leaf filter must be a JSON object".to_string()))?;

    if let (Some(gt), Some(lt)) = (obj.get("$gt"), obj.get("$lt")) {
        if obj.len() != 2 {
            return Err(SiftError::InvalidFilterSyntax(
                "$gt/$lt combine into $between only when they are the object's sole keys".to_string(),
            ));
        }
        let lower = scalar_arg("$gt", gt)?;
        let upper = scalar_arg("$lt", lt)?;
        if lower.kind() != upper.kind() {
            return Err(SiftError::InvalidFilterSyntax(
                "$between bounds must share a comparable kind".to_string(),
            ));
        }
        return Ok(FilterLeaf::Between { lower, upper });
    }

    if obj.len() != 1 {
        return Err(SiftError::InvalidFilterSyntax(format!(
            "a leaf filter must have exactly one operator key, found {}",
            obj.len()
        )));
    }
    let (key, arg) = obj.iter().next().expect("len checked above");

    Ok(match key.as_str() {
        "$eq" => FilterLeaf::Eq(scalar_arg("$eq", arg)?),
        "$ne" => FilterLeaf::Ne(scalar_arg("$ne", arg)?),
        "$gt" => FilterLeaf::Gt(scalar_arg("$gt", arg)?),
        "$lt" => FilterLeaf::Lt(scalar_arg("$lt", arg)?),
        "$in" => FilterLeaf::In(list_arg("$in", arg)?),
        "$nin" => FilterLeaf::Nin(list_arg("$nin", arg)?),
        "$like" => FilterLeaf::Like(string_arg("$like", arg)?),
        "$unlike" => FilterLeaf::Unlike(string_arg("$unlike", arg)?),
        "$has" => FilterLeaf::Has(bool_arg("$has", arg)?),
        other => {
            return Err(SiftError::InvalidFilterSyntax(format!(
                "unrecognized filter operator {other:?}"
            )))
        }
    })
}

/// Compiles one leaf filter against a resolved column/path into a total
/// boolean SQL expression.
///
/// `children` is the residual dotted path past the root column (empty for a
/// direct column filter). `column_type` is the root column's declared SQL
/// type, used for the compatibility precheck when `children` is empty and
/// to pick the dialect's JSON function family when it is not.
pub fn compile(
    dialect: Dialect,
    column: &str,
    column_type: ColumnType,
    children: &[String],
    leaf: &FilterLeaf,
) -> Result<Sql> {
    if let FilterLeaf::Has(expected) = leaf {
        return compile_has(dialect, column, column_type, children, *expected);
    }

    if children.is_empty() {
        if let Some(kind) = leaf.kind() {
            if !registry::is_compatible(kind, column_type) {
                return Ok(literal_false());
            }
        }
    }

    if matches!(leaf, FilterLeaf::In(v) | FilterLeaf::Nin(v) if v.is_empty()) {
        return Ok(literal_false());
    }

    let kind = match leaf.kind() {
        Some(k) => k,
        None => return Ok(literal_false()),
    };

    let value = crate::valueref::value_ref(dialect, column, column_type, children)?;
    let guard = guard::type_guard(dialect, column, column_type, children, kind)?;

    // A native column already has the declared SQL type; casting exists to
    // normalize what a JSON extraction function hands back (e.g. MySQL's
    // JSON_UNQUOTE), so it only applies to a resolved nested path.
    let cast_dialect = if children.is_empty() { None } else { Some(dialect) };
    let lhs = maybe_cast(cast_dialect, kind, value);

    let comparison = match leaf {
        FilterLeaf::Eq(v) => binary_cmp(cast_dialect, kind, lhs, "=", v.clone()),
        FilterLeaf::Ne(v) => binary_cmp(cast_dialect, kind, lhs, "<>", v.clone()),
        FilterLeaf::Gt(v) => binary_cmp(cast_dialect, kind, lhs, ">", v.clone()),
        FilterLeaf::Lt(v) => binary_cmp(cast_dialect, kind, lhs, "<", v.clone()),
        FilterLeaf::Between { lower, upper } => {
            let rhs_lower = maybe_cast(cast_dialect, kind, Sql::param(lower.clone()));
            let rhs_upper = maybe_cast(cast_dialect, kind, Sql::param(upper.clone()));
            Sql::raw("(")
                .append(lhs.clone())
                .push_raw(" > ")
                .append(rhs_lower)
                .push_raw(" AND ")
                .append(lhs)
                .push_raw(" < ")
                .append(rhs_upper)
                .push_raw(")")
        }
        FilterLeaf::In(values) => compile_in(cast_dialect, kind, lhs, values, false),
        FilterLeaf::Nin(values) => compile_in(cast_dialect, kind, lhs, values, true),
        FilterLeaf::Like(pattern) => compile_like(dialect, cast_dialect, lhs, pattern, false),
        FilterLeaf::Unlike(pattern) => compile_like(dialect, cast_dialect, lhs, pattern, true),
        FilterLeaf::Has(_) => unreachable!("handled above"),
    };

    Ok(match guard {
        Some(guard) => Sql::raw("CASE WHEN ")
            .append(guard)
            .push_raw(" THEN ")
            .append(comparison)
            .push_raw(" ELSE FALSE END"),
        None => comparison,
    })
}

fn literal_false() -> Sql {
    Sql::raw("FALSE")
}

fn maybe_cast(cast_dialect: Option<Dialect>, kind: Kind, expr: Sql) -> Sql {
    match cast_dialect {
        Some(dialect) => caster::cast(dialect, kind, expr),
        None => expr,
    }
}

fn binary_cmp(cast_dialect: Option<Dialect>, kind: Kind, lhs: Sql, op: &str, rhs: Value) -> Sql {
    let rhs = maybe_cast(cast_dialect, kind, Sql::param(rhs));
    lhs.push_raw(format!(" {op} ")).append(rhs)
}

fn compile_in(cast_dialect: Option<Dialect>, kind: Kind, lhs: Sql, values: &[Value], negate: bool) -> Sql {
    let op = if negate { "NOT IN" } else { "IN" };
    let list = Sql::join(
        values
            .iter()
            .cloned()
            .map(|v| maybe_cast(cast_dialect, kind, Sql::param(v))),
        ", ",
    );
    lhs.push_raw(format!(" {op} (")).append(list).push_raw(")")
}

fn compile_like(dialect: Dialect, cast_dialect: Option<Dialect>, lhs: Sql, pattern: &str, negate: bool) -> Sql {
    let rhs = maybe_cast(cast_dialect, Kind::String, Sql::param(Value::String(pattern.to_string())));

    if dialect == Dialect::PostgreSQL {
        let op = if negate { "NOT ILIKE" } else { "ILIKE" };
        return lhs.push_raw(format!(" {op} ")).append(rhs);
    }

    // No native ILIKE outside PostgreSQL: fold both sides to lowercase so the
    // match is case-insensitive regardless of the column's collation.
    let op = if negate { "NOT LIKE" } else { "LIKE" };
    Sql::raw("LOWER(")
        .append(lhs)
        .push_raw(")")
        .push_raw(format!(" {op} LOWER("))
        .append(rhs)
        .push_raw(")")
}

/// `$has` bypasses the normal cast/guard flow: it tests presence, not value
/// equality, so there is no comparable kind to guard against and no cast to
/// apply.
///
/// On the root (`children` empty), presence reduces to SQL `IS [NOT] NULL`
/// on the column itself. On a nested path, "present" additionally excludes
/// a path that resolves to the literal JSON `null`, since `json_extract`/
/// `JSON_VALUE`/`json_extract_path` all collapse "absent" and "holds JSON
/// null" to SQL `NULL` — [`guard::not_json_null`] supplies the extra check
/// dialect by dialect.
fn compile_has(
    dialect: Dialect,
    column: &str,
    column_type: ColumnType,
    children: &[String],
    expected: bool,
) -> Result<Sql> {
    if children.is_empty() {
        let op = if expected { "IS NOT NULL" } else { "IS NULL" };
        return Ok(Sql::raw(format!("{column} {op}")));
    }

    let value = crate::valueref::value_ref(dialect, column, column_type, children)?;
    let not_null = value.clone().push_raw(" IS NOT NULL");
    let not_json_null = guard::not_json_null(dialect, column, column_type, children, &value)?;

    let presence = Sql::raw("(")
        .append(not_null)
        .push_raw(" AND ")
        .append(not_json_null)
        .push_raw(")");

    Ok(if expected {
        presence
    } else {
        Sql::raw("NOT ").append(presence)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(sql: &Sql, dialect: Dialect) -> String {
        sql.render(dialect, 1).0
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_simple_operators() {
        let leaf = parse_leaf(&serde_json::json!({"$eq": 5})).unwrap();
        assert_eq!(leaf, FilterLeaf::Eq(Value::Int(5)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_gt_lt_as_between() {
        let leaf = parse_leaf(&serde_json::json!({"$gt": 0, "$lt": 10})).unwrap();
        assert_eq!(
            leaf,
            FilterLeaf::Between {
                lower: Value::Int(0),
                upper: Value::Int(10)
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_unknown_operator() {
        let err = parse_leaf(&serde_json::json!({"$bogus": 1})).unwrap_err();
        assert!(matches!(err, SiftError::InvalidFilterSyntax(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_multiple_unrelated_keys() {
        let err = parse_leaf(&serde_json::json!({"$eq": 1, "$ne": 2})).unwrap_err();
        assert!(matches!(err, SiftError::InvalidFilterSyntax(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rejects_incoherent_in_list() {
        let err = parse_leaf(&serde_json::json!({"$in": [1, "x"]})).unwrap_err();
        assert!(matches!(err, SiftError::IncoherentList { .. }));
    }

    #[test]
    fn incompatible_kind_on_direct_column_short_circuits_false() {
        let leaf = FilterLeaf::Eq(Value::String("x".into()));
        let sql = compile(Dialect::SQLite, "age", ColumnType::Integer, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "FALSE");
    }

    #[test]
    fn empty_in_list_short_circuits_false() {
        let leaf = FilterLeaf::In(vec![]);
        let sql = compile(Dialect::SQLite, "age", ColumnType::Integer, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "FALSE");
    }

    #[test]
    fn direct_column_eq_has_no_guard() {
        let leaf = FilterLeaf::Eq(Value::Int(30));
        let sql = compile(Dialect::SQLite, "age", ColumnType::Integer, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "age = ?");
    }

    #[test]
    fn nested_path_eq_wraps_in_case_guard() {
        let leaf = FilterLeaf::Eq(Value::Int(30));
        let children = vec!["age".to_string()];
        let sql = compile(Dialect::SQLite, "data", ColumnType::Text, &children, &leaf).unwrap();
        let text = render(&sql, Dialect::SQLite);
        assert!(text.starts_with("CASE WHEN json_type(data, '$.\"age\"') IN ('integer') THEN"));
        assert!(text.ends_with("ELSE FALSE END"));
    }

    #[test]
    fn between_emits_strict_exclusive_bounds() {
        let leaf = FilterLeaf::Between {
            lower: Value::Int(0),
            upper: Value::Int(10),
        };
        let sql = compile(Dialect::SQLite, "age", ColumnType::Integer, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "(age > ? AND age < ?)");
    }

    #[test]
    fn has_true_on_root_is_is_not_null() {
        let sql = compile_has(Dialect::SQLite, "nickname", ColumnType::Text, &[], true).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "nickname IS NOT NULL");
    }

    #[test]
    fn has_false_on_nested_path_negates_presence() {
        let children = vec!["middle".to_string()];
        let sql = compile_has(Dialect::SQLite, "data", ColumnType::Text, &children, false).unwrap();
        let text = render(&sql, Dialect::SQLite);
        assert!(text.starts_with("NOT ("));
        assert!(text.contains("IS NOT NULL"));
        assert!(text.contains("json_type"));
    }

    #[test]
    fn like_uses_ilike_on_postgres() {
        let leaf = FilterLeaf::Like("%smith%".into());
        let sql = compile(Dialect::PostgreSQL, "name", ColumnType::Text, &[], &leaf).unwrap();
        assert!(render(&sql, Dialect::PostgreSQL).contains("ILIKE"));
    }

    #[test]
    fn direct_column_like_on_mysql_is_not_json_unquoted() {
        let leaf = FilterLeaf::Like("%smith%".into());
        let sql = compile(Dialect::MySQL, "name", ColumnType::Text, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::MySQL), "LOWER(name) LIKE LOWER(?)");
    }

    #[test]
    fn nested_path_like_on_mysql_is_json_unquoted() {
        let children = vec!["name".to_string()];
        let leaf = FilterLeaf::Like("%smith%".into());
        let sql = compile(Dialect::MySQL, "data", ColumnType::Json, &children, &leaf).unwrap();
        let text = render(&sql, Dialect::MySQL);
        assert!(text.contains("LOWER(JSON_UNQUOTE(json_extract(data"));
    }

    #[test]
    fn unlike_on_sqlite_lowercases_both_sides() {
        let leaf = FilterLeaf::Unlike("%smith%".into());
        let sql = compile(Dialect::SQLite, "name", ColumnType::Text, &[], &leaf).unwrap();
        assert_eq!(render(&sql, Dialect::SQLite), "LOWER(name) NOT LIKE LOWER(?)");
    }
}
