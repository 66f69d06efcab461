//! Configuration error model.
//!
//! Evaluation never fails: every invalid input degrades to a denial. The only
//! fallible step is loading configuration, which is reported here.

use thiserror::Error;

use careflow_core::CoreError;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown role '{0}' in permission document")]
    UnknownRole(String),

    #[error("unknown module '{0}' in permission document")]
    UnknownModule(String),

    #[error("unknown action '{0}' in permission document")]
    UnknownAction(String),

    #[error("invalid fallback tenant: {0}")]
    InvalidTenant(#[from] CoreError),

    #[error("tenant field name must not be blank")]
    BlankTenantField,

    #[error("unknown route path '{0}'")]
    UnknownRoute(String),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
