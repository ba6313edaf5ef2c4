//! The value-reference builder: given a root column, a residual child path,
//! and a dialect, produces a SQL expression that extracts the value at that
//! path.

use crate::dialect::Dialect;
use crate::error::{Result, SiftError};
use crate::registry::ColumnType;
use crate::sql::Sql;

/// Escapes a single quote by doubling it, the standard SQL string-literal
/// escape, so a segment can be embedded inside a `'...'` literal without
/// breaking out of it. Applied in addition to (not instead of) the
/// `InvalidSegment` check below: that check guards the JSON-path
/// mini-language's own quoting, this guards the outer SQL string literal.
fn escape_for_sql_literal(segment: &str) -> String {
    segment.replace('\'', "''")
}

/// Quotes a single JSON path segment with double quotes for embedding in a
/// `$."seg1"."seg2"` style path expression.
///
/// Rejects a segment containing an embedded `"` with
/// [`SiftError::InvalidSegment`], since a naively quoted `"` would break out
/// of the path literal's own quoting. A `.` cannot appear because segments
/// are produced by splitting the dotted path on `.` upstream.
fn quote_segment(segment: &str) -> Result<String> {
    if segment.contains('"') {
        return Err(SiftError::InvalidSegment(segment.to_string()));
    }
    Ok(format!("\"{}\"", escape_for_sql_literal(segment)))
}

/// Builds the `$."seg1"."seg2"` path literal used by SQLite/MySQL/MariaDB
/// `json_extract` and MSSQL/Oracle `JSON_VALUE`.
pub(crate) fn json_path_literal(children: &[String]) -> Result<String> {
    let mut path = String::from("$");
    for segment in children {
        path.push('.');
        path.push_str(&quote_segment(segment)?);
    }
    Ok(path)
}

/// Builds the SQL expression that extracts the value at `children` within
/// `column`. For an empty `children`, returns the root column expression
/// unchanged (identity) — no JSON function is ever invoked on a path with no
/// residual segments.
pub fn value_ref(
    dialect: Dialect,
    column: &str,
    column_type: ColumnType,
    children: &[String],
) -> Result<Sql> {
    if children.is_empty() {
        return Ok(Sql::raw(column));
    }

    match dialect {
        Dialect::PostgreSQL => {
            let func = if column_type == ColumnType::Jsonb {
                "jsonb_extract_path"
            } else {
                "json_extract_path"
            };
            let mut args = vec![Sql::raw(column)];
            args.extend(
                children
                    .iter()
                    .map(|seg| Sql::raw(format!("'{}'", escape_for_sql_literal(seg)))),
            );
            Ok(Sql::raw(format!("{func}(")).append(Sql::join(args, ", ")).push_raw(")"))
        }
        Dialect::MsSql | Dialect::Oracle => {
            let path = json_path_literal(children)?;
            Ok(Sql::raw(format!("JSON_VALUE({column}, '{path}')")))
        }
        Dialect::SQLite | Dialect::MySQL => {
            let path = json_path_literal(children)?;
            Ok(Sql::raw(format!("json_extract({column}, '{path}')")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(sql: &Sql) -> String {
        sql.render(Dialect::SQLite, 1).0
    }

    #[test]
    fn empty_children_is_identity() {
        let sql = value_ref(Dialect::SQLite, "data", ColumnType::Text, &[]).unwrap();
        assert_eq!(render(&sql), "data");
    }

    #[test]
    fn sqlite_and_mysql_use_json_extract() {
        let children = vec!["age".to_string()];
        let sqlite = value_ref(Dialect::SQLite, "data", ColumnType::Text, &children).unwrap();
        assert_eq!(sqlite.render(Dialect::SQLite, 1).0, "json_extract(data, '$.\"age\"')");

        let mysql = value_ref(Dialect::MySQL, "data", ColumnType::Json, &children).unwrap();
        assert_eq!(mysql.render(Dialect::MySQL, 1).0, "json_extract(data, '$.\"age\"')");
    }

    #[test]
    fn postgres_picks_json_vs_jsonb_function() {
        let children = vec!["age".to_string()];
        let json = value_ref(Dialect::PostgreSQL, "data", ColumnType::Json, &children).unwrap();
        assert_eq!(
            json.render(Dialect::PostgreSQL, 1).0,
            "json_extract_path(data, 'age')"
        );

        let jsonb = value_ref(Dialect::PostgreSQL, "data", ColumnType::Jsonb, &children).unwrap();
        assert_eq!(
            jsonb.render(Dialect::PostgreSQL, 1).0,
            "jsonb_extract_path(data, 'age')"
        );
    }

    #[test]
    fn mssql_and_oracle_use_json_value() {
        let children = vec!["a".to_string(), "b".to_string()];
        let mssql = value_ref(Dialect::MsSql, "data", ColumnType::Text, &children).unwrap();
        assert_eq!(
            mssql.render(Dialect::MsSql, 1).0,
            "JSON_VALUE(data, '$.\"a\".\"b\"')"
        );
        let oracle = value_ref(Dialect::Oracle, "data", ColumnType::Text, &children).unwrap();
        assert_eq!(
            oracle.render(Dialect::Oracle, 1).0,
            "JSON_VALUE(data, '$.\"a\".\"b\"')"
        );
    }

    #[test]
    fn rejects_segment_with_embedded_quote() {
        let children = vec!["weird\"name".to_string()];
        let err = value_ref(Dialect::SQLite, "data", ColumnType::Text, &children).unwrap_err();
        assert!(matches!(err, SiftError::InvalidSegment(_)));
    }
}
