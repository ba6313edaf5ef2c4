//! Tracing utilities for filter/pagination observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level event with the rendered `WHERE`/`ORDER BY` text and
/// bound parameter count.
#[macro_export]
macro_rules! sift_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "sqlsift.query");
    };
}

/// Emit a trace-level event when a filter document entry is skipped because
/// its head path segment does not resolve against the model.
#[macro_export]
macro_rules! sift_trace_skipped_field {
    ($path:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %$path, "sqlsift.skipped_field");
    };
}
