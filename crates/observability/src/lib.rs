//! Tracing/logging setup shared by hosts embedding the DTE client.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::{LOG_FORMAT_VAR, LogFormat, init_with};

/// Initialize process-wide logging filtered by `RUST_LOG` (default `info`).
///
/// The format comes from `LOG_FORMAT` (JSON unless it says `compact`).
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    init_with(LogFormat::from_env(), "info");
}
