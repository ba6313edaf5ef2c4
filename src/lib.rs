//! Declarative JSON filter compilation, sorting, and offset pagination for
//! SQL backends.
//!
//! A caller describes a table as a [`schema::ModelSchema`], submits a filter
//! document (dotted field paths paired with leaf operator objects like
//! `{"$gt": 5}`), a sort token list, and a page request. This crate compiles
//! all three into dialect-correct, injection-safe SQL fragments, and — when
//! the `sqlite` feature is enabled — can run the resulting query end to end
//! against an embedded database.
//!
//! Every compiled predicate is total: a filter whose comparable kind doesn't
//! match what is actually stored at a path evaluates to `FALSE` rather than
//! raising a runtime type error, so a filter document from an untrusted
//! client can never crash a query.
//!
//! ```
//! use sqlsift::dialect::Dialect;
//! use sqlsift::registry::ColumnType;
//! use sqlsift::schema::{FieldKind, FieldSchema, ModelSchema};
//! use sqlsift::filter::{self, FilterLeaf};
//! use sqlsift::value::Value;
//!
//! let model = ModelSchema::new("person", "id")
//!     .field("age", FieldSchema::scalar(FieldKind::Integer, ColumnType::Integer));
//!
//! let leaf = FilterLeaf::Gt(Value::Int(18));
//! let sql = filter::compile(Dialect::SQLite, "age", ColumnType::Integer, &[], &leaf).unwrap();
//! assert_eq!(sql.render(Dialect::SQLite, 1).0, "age > ?");
//! ```

pub mod caster;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod guard;
pub mod registry;
pub mod schema;
pub mod sort;
pub mod sql;
pub mod tracing;
pub mod value;
pub mod valueref;

#[cfg(feature = "serde")]
pub mod document;

#[cfg(feature = "serde")]
pub mod paginate;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use dialect::Dialect;
pub use error::{Result, SiftError};
pub use sql::Sql;
pub use value::Value;
