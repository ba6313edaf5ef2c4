//! SQL dialect identification and placeholder rendering.

use crate::error::SiftError;
use std::borrow::Cow;
use std::fmt;

/// A supported SQL dialect.
///
/// Every compiler primitive in this crate (value-reference builder, caster,
/// type-guard builder, filter compiler) takes a `Dialect` at call time: the
/// dialect axis is a runtime parameter here, not a compile-time one, so a
/// single enum covers every backend rather than one crate per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// SQLite — `?` positional placeholders, JSON1 `json_extract`/`json_type`.
    #[default]
    SQLite,
    /// PostgreSQL — `$1, $2, ...` numbered placeholders, native `json`/`jsonb`.
    PostgreSQL,
    /// MySQL or MariaDB — `?` positional placeholders, `JSON_EXTRACT`/`JSON_TYPE`.
    MySQL,
    /// Microsoft SQL Server — `@pN` named placeholders, `JSON_VALUE`.
    MsSql,
    /// Oracle Database — `:N` placeholders, `JSON_VALUE`.
    Oracle,
}

impl Dialect {
    /// Parses a dialect from a case-insensitive string, accepting the common
    /// aliases a caller's connection URI scheme would use.
    pub fn parse(s: &str) -> core::result::Result<Self, SiftError> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "mssql" | "sqlserver" | "sql-server" => Ok(Dialect::MsSql),
            "oracle" => Ok(Dialect::Oracle),
            other => Err(SiftError::UnsupportedDialect(other.to_string())),
        }
    }

    /// Renders the placeholder for the `index`-th (1-based) bound parameter.
    pub fn render_placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::PostgreSQL => Cow::Owned(format!("${index}")),
            Dialect::SQLite | Dialect::MySQL => Cow::Borrowed("?"),
            Dialect::MsSql => Cow::Owned(format!("@p{index}")),
            Dialect::Oracle => Cow::Owned(format!(":{index}")),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
            Dialect::MySQL => "mysql",
            Dialect::MsSql => "mssql",
            Dialect::Oracle => "oracle",
        };
        f.write_str(s)
    }
}
