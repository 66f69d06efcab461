//! Tenant (hospital) label.

use std::borrow::Cow;

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Opaque identifier of a tenant (hospital).
///
/// Two labels are equal iff they are the same string. There is no hierarchy
/// and no case folding: `"Hope"` and `"hope"` are different tenants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantLabel(Cow<'static, str>);

impl TenantLabel {
    /// Create a label, rejecting empty or whitespace-only input.
    pub fn new(label: impl Into<String>) -> CoreResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(CoreError::invalid_tenant_label(label));
        }
        Ok(Self(Cow::Owned(label)))
    }

    /// Label from a literal, checked at compile time when used in a `const`.
    ///
    /// Panics if `label` is empty.
    pub const fn from_static(label: &'static str) -> Self {
        assert!(!label.is_empty(), "tenant label must not be empty");
        Self(Cow::Borrowed(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TenantLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TenantLabel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantLabel> for String {
    fn from(value: TenantLabel) -> Self {
        value.0.into_owned()
    }
}

impl AsRef<str> for TenantLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
