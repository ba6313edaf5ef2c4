//! Error types for sqlsift.

use thiserror::Error;

/// Errors raised while compiling or running a filter/pagination query.
///
/// `UnknownField` is deliberately absent: per the binder contract
/// (see [`crate::document::bind_filters`]) an unresolvable path is a silent
/// skip, not a failure.
#[derive(Debug, Error)]
pub enum SiftError {
    /// The filter document or a sort token was malformed JSON/syntax.
    #[error("invalid filter syntax: {0}")]
    InvalidFilterSyntax(String),

    /// An `$in`/`$nin` list mixed comparable kinds.
    #[error("incoherent list: element {index} has a different kind than the first element")]
    IncoherentList {
        /// Index of the first offending element.
        index: usize,
    },

    /// A sort token named a direction other than `asc`/`desc`.
    #[error("invalid sort direction: {0:?}")]
    InvalidDirection(String),

    /// A comparable kind has no registered column-type compatibility table.
    #[error("unsupported comparable kind: {0}")]
    UnsupportedKind(String),

    /// The dialect is not one of the five supported backends.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// A JSON path segment contained a character that cannot be safely quoted.
    #[error("invalid path segment {0:?}: embedded quotes are not allowed")]
    InvalidSegment(String),

    /// The underlying database driver returned an error executing the rows
    /// or count statement. Propagated unchanged; sqlsift never retries.
    #[error("execution error: {0}")]
    Execution(ExecutionError),
}

/// Opaque wrapper around a driver-specific execution failure.
///
/// Kept separate from [`SiftError`] so that enabling/disabling the `sqlite`
/// feature does not change `SiftError`'s public shape.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ExecutionError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl ExecutionError {
    /// Wraps any driver error in an [`ExecutionError`].
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for SiftError {
    fn from(err: rusqlite::Error) -> Self {
        SiftError::Execution(ExecutionError::new(err))
    }
}

/// Result type for sqlsift operations.
pub type Result<T> = core::result::Result<T, SiftError>;
