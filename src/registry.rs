//! Static tables mapping comparable kinds to compatible column types and to
//! the JSON-type tokens each dialect reports for a value of that kind.
//!
//! Both functions are pure and hold no state; they exist only to centralize
//! the compatibility matrix as data instead of scattering `match` arms
//! across the filter compiler.

use crate::dialect::Dialect;
use crate::error::{Result, SiftError};
use crate::value::Kind;

/// A physical SQL column type tag, as declared on a [`crate::schema::FieldSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    Decimal,
    Double,
    Float,
    Numeric,
    Real,
    BigInt,
    Integer,
    SmallInt,
    Date,
    Time,
    Timestamp,
    AutoString,
    Char,
    Clob,
    StringText,
    Text,
    VarChar,
    /// PostgreSQL `JSON` column (text-encoded JSON).
    Json,
    /// PostgreSQL `JSONB` column (binary-encoded JSON).
    Jsonb,
}

impl ColumnType {
    fn is_temporal(self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Time | ColumnType::Timestamp)
    }
}

/// Returns the set of physical column type tags compatible with a comparable
/// of the given `kind`. String subsumes temporal types: dates/times are
/// filtered as ISO strings.
pub fn column_types_for(kind: Kind) -> &'static [ColumnType] {
    use ColumnType::*;
    match kind {
        Kind::Bool => &[Boolean],
        Kind::Float => &[Decimal, Double, Float, Numeric, Real],
        Kind::Int => &[BigInt, Integer, SmallInt],
        Kind::String => &[
            Date, Time, Timestamp, AutoString, Char, Clob, StringText, Text, VarChar,
        ],
    }
}

/// Returns `true` iff `column` is one of the compatible tags for `kind`.
pub fn is_compatible(kind: Kind, column: ColumnType) -> bool {
    column_types_for(kind).contains(&column) || (kind == Kind::String && column.is_temporal())
}

/// Returns the list of JSON-type tokens a dialect's JSON-type introspection
/// function (`json_type`, `json_typeof`, `JSON_TYPE`, ...) reports for a
/// value of `kind`.
///
/// Fails with [`SiftError::UnsupportedKind`] for an unregistered kind — in
/// practice unreachable since [`Kind`] is exhaustive — kept `Result` to
/// give future dialect additions a place to fail loudly instead of
/// panicking.
pub fn json_type_tokens_for(dialect: Dialect, kind: Kind) -> Result<&'static [&'static str]> {
    Ok(match (dialect, kind) {
        (Dialect::SQLite, Kind::Bool) => &["true", "false"],
        (Dialect::SQLite, Kind::Float) => &["real"],
        (Dialect::SQLite, Kind::Int) => &["integer"],
        (Dialect::SQLite, Kind::String) => &["text"],

        (Dialect::MySQL, Kind::Bool) => &["BOOLEAN"],
        (Dialect::MySQL, Kind::Float) => &["DOUBLE"],
        (Dialect::MySQL, Kind::Int) => &["INTEGER"],
        (Dialect::MySQL, Kind::String) => &["STRING"],

        (Dialect::PostgreSQL, Kind::Bool) => &["boolean"],
        (Dialect::PostgreSQL, Kind::Float) => &["number"],
        (Dialect::PostgreSQL, Kind::Int) => &["number"],
        (Dialect::PostgreSQL, Kind::String) => &["string"],

        (Dialect::MsSql, Kind::Bool) => &["boolean"],
        (Dialect::MsSql, Kind::Float) => &["number"],
        (Dialect::MsSql, Kind::Int) => &["number"],
        (Dialect::MsSql, Kind::String) => &["string"],

        (Dialect::Oracle, Kind::Bool) => &["boolean"],
        (Dialect::Oracle, Kind::Float) => &["number"],
        (Dialect::Oracle, Kind::Int) => &["number"],
        (Dialect::Oracle, Kind::String) => &["string"],
    })
}

/// Returns `true` iff dialect's JSON-null literal token equals `token`
/// (used by `$has` on nested paths to distinguish "absent" from "present but
/// JSON null").
pub fn is_json_null_token(dialect: Dialect, token: &str) -> bool {
    match dialect {
        Dialect::SQLite => token == "null",
        Dialect::MySQL | Dialect::MsSql | Dialect::Oracle => {
            token.eq_ignore_ascii_case("null")
        }
        Dialect::PostgreSQL => token == "null",
    }
}
