//! Tracing/logging setup shared by shopdesk binaries.

/// Initialize process-wide observability (tracing/logging), filtered by
/// `RUST_LOG` or else `default_filter` (e.g. `"warn"` for quiet command-line
/// use).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with_default(default_filter: &str) {
    tracing::init(default_filter);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
