//! Tracing/logging setup shared by every careflow host process.

pub use crate::tracing::{LogConfig, LogFormat};

/// Initialize process-wide logging with [`LogConfig::default`].
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&LogConfig::default());
}

/// Initialize process-wide logging with an explicit configuration.
pub fn init_with(config: &LogConfig) {
    tracing::init(config);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
