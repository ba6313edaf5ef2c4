//! The caster: dialect-specific value normalization applied uniformly to
//! both sides of a comparison so that the path value and the literal are of
//! matching SQL type.
//!
//! Only PostgreSQL needs a real `CAST`; MySQL/MariaDB unquote JSON strings;
//! every other dialect is identity. A whole-JSON-document cast row has no
//! corresponding comparison operator (nothing compares a whole JSON
//! document) and is not implemented — see DESIGN.md.

use crate::dialect::Dialect;
use crate::sql::Sql;
use crate::value::Kind;

/// Applies the dialect-specific cast for `kind` to `expr`.
pub fn cast(dialect: Dialect, kind: Kind, expr: Sql) -> Sql {
    match dialect {
        Dialect::PostgreSQL => match kind {
            Kind::Bool => Sql::raw("CAST(").append(expr).push_raw(" AS BOOLEAN)"),
            Kind::Float => Sql::raw("CAST(").append(expr).push_raw(" AS FLOAT)"),
            Kind::Int => Sql::raw("CAST(").append(expr).push_raw(" AS INTEGER)"),
            Kind::String => Sql::raw("TRIM(CAST(")
                .append(expr)
                .push_raw(" AS TEXT), '\"')"),
        },
        Dialect::MySQL => match kind {
            Kind::String => Sql::raw("JSON_UNQUOTE(").append(expr).push_raw(")"),
            _ => expr,
        },
        Dialect::SQLite | Dialect::MsSql | Dialect::Oracle => expr,
    }
}
