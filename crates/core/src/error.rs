//! Core error model.

use thiserror::Error;

/// Result type used by the core value types.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error raised while constructing core values.
///
/// Only construction can fail; once a value exists it is valid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A tenant label was empty or whitespace-only.
    #[error("invalid tenant label: {0:?}")]
    InvalidTenantLabel(String),
}

impl CoreError {
    pub fn invalid_tenant_label(raw: impl Into<String>) -> Self {
        Self::InvalidTenantLabel(raw.into())
    }
}
