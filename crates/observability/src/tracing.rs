//! Tracing/logging initialization.
//!
//! `RUST_LOG` always wins over the configured default directive.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Output format of log lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Single-line human-readable text.
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset, e.g. `"info,careflow_auth=debug"`.
    pub default_directive: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            default_directive: "info".to_string(),
        }
    }
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&self.default_directive).unwrap_or_else(|_| EnvFilter::new("info"))
        })
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init(&LogConfig::default());
        init(&LogConfig {
            format: LogFormat::Compact,
            default_directive: "debug".to_string(),
        });
        ::tracing::info!("still logging");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: LogConfig = serde_json::from_str(r#"{ "format": "compact" }"#).unwrap();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.default_directive, "info");

        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn invalid_directive_falls_back() {
        let config = LogConfig {
            format: LogFormat::Json,
            default_directive: "[[not a filter".to_string(),
        };
        // Must not panic.
        let _ = config.filter();
    }
}
