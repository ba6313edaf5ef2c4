//! The type-guard builder: a boolean SQL expression that is TRUE iff the
//! value at a resolved path has a JSON type compatible with the comparable
//! under test. Guards are what make a predicate total: a `$gt` filter
//! against a path whose JSON type doesn't match the comparable kind falls
//! through to `FALSE` instead of raising at execution time.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::registry::{self, ColumnType};
use crate::sql::Sql;
use crate::value::Kind;
use crate::valueref::{json_path_literal, value_ref};

/// Builds the type guard for a nested path. Returns `Ok(None)` for a path
/// with no residual children: the static column type already guarantees
/// compatibility, so no guard is emitted.
pub fn type_guard(
    dialect: Dialect,
    column: &str,
    column_type: ColumnType,
    children: &[String],
    kind: Kind,
) -> Result<Option<Sql>> {
    if children.is_empty() {
        return Ok(None);
    }

    let tokens = registry::json_type_tokens_for(dialect, kind)?;
    let token_list = Sql::join(
        tokens.iter().map(|t| Sql::raw(format!("'{t}'"))),
        ", ",
    );

    let guard = match dialect {
        Dialect::SQLite => {
            let path = json_path_literal(children)?;
            Sql::raw(format!("json_type({column}, '{path}') IN ("))
                .append(token_list)
                .push_raw(")")
        }
        Dialect::PostgreSQL => {
            let func = if column_type == ColumnType::Jsonb {
                "jsonb_typeof"
            } else {
                "json_typeof"
            };
            let value = value_ref(dialect, column, column_type, children)?;
            Sql::raw(format!("{func}("))
                .append(value)
                .push_raw(") IN (")
                .append(token_list)
                .push_raw(")")
        }
        Dialect::MySQL | Dialect::MsSql | Dialect::Oracle => {
            let value = value_ref(dialect, column, column_type, children)?;
            Sql::raw("JSON_TYPE(")
                .append(value)
                .push_raw(") IN (")
                .append(token_list)
                .push_raw(")")
        }
    };

    Ok(Some(guard))
}

/// Builds the "value is present and is not the literal JSON `null`" check
/// used by `$has` on nested paths.
///
/// For MSSQL/Oracle this case is left to dialect knowledge: `JSON_VALUE`
/// returns SQL `NULL` both when the path is absent and when it holds a JSON
/// `null`, so the `V IS NOT NULL` presence check already excludes JSON
/// nulls and no separate check is needed — this returns a tautological
/// `Sql::raw("1=1")` for those two dialects so callers can `AND` it in
/// uniformly.
pub fn not_json_null(dialect: Dialect, column: &str, column_type: ColumnType, children: &[String], value: &Sql) -> Result<Sql> {
    Ok(match dialect {
        Dialect::SQLite => {
            let path = json_path_literal(children)?;
            Sql::raw(format!("json_type({column}, '{path}') <> 'null'"))
        }
        Dialect::PostgreSQL => {
            let func = if column_type == ColumnType::Jsonb {
                "jsonb_typeof"
            } else {
                "json_typeof"
            };
            Sql::raw(format!("{func}(")).append(value.clone()).push_raw(") <> 'null'")
        }
        Dialect::MySQL => Sql::raw("JSON_TYPE(")
            .append(value.clone())
            .push_raw(") <> 'NULL'"),
        Dialect::MsSql | Dialect::Oracle => Sql::raw("1=1"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(sql: &Sql, dialect: Dialect) -> String {
        sql.render(dialect, 1).0
    }

    #[test]
    fn no_guard_for_non_nested_path() {
        let guard = type_guard(Dialect::SQLite, "age", ColumnType::Integer, &[], Kind::Int).unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn sqlite_guard_uses_json_type_on_root() {
        let children = vec!["age".to_string()];
        let guard = type_guard(Dialect::SQLite, "data", ColumnType::Text, &children, Kind::Int)
            .unwrap()
            .unwrap();
        assert_eq!(
            render(&guard, Dialect::SQLite),
            "json_type(data, '$.\"age\"') IN ('integer')"
        );
    }

    #[test]
    fn postgres_guard_uses_typeof_on_extracted_value() {
        let children = vec!["age".to_string()];
        let guard = type_guard(Dialect::PostgreSQL, "data", ColumnType::Jsonb, &children, Kind::Int)
            .unwrap()
            .unwrap();
        assert_eq!(
            render(&guard, Dialect::PostgreSQL),
            "jsonb_typeof(jsonb_extract_path(data, 'age')) IN ('number')"
        );
    }

    #[test]
    fn mssql_oracle_not_json_null_is_tautological() {
        let children = vec!["include".to_string()];
        let value = Sql::raw("JSON_VALUE(data, '$.\"include\"')");
        let check = not_json_null(Dialect::MsSql, "data", ColumnType::Text, &children, &value).unwrap();
        assert_eq!(render(&check, Dialect::MsSql), "1=1");
    }
}
