//! Identity and session state supplied by the session provider.
//!
//! These are read-only inputs. The engine never mutates an identity; it only
//! reads role, activation and tenant.

use serde::{Deserialize, Deserializer, Serialize};

use careflow_core::TenantLabel;

use crate::roles::Role;

/// The signed-in identity as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Role exactly as stored; normalized by [`Identity::role`].
    pub role: String,
    pub active: bool,
    /// Blank or missing means "no label"; the fallback tenant applies.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tenant: Option<TenantLabel>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    /// An active identity with no tenant or display name.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            active: true,
            tenant: None,
            display_name: None,
        }
    }

    pub fn with_tenant(mut self, tenant: TenantLabel) -> Self {
        self.tenant = Some(tenant);
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }

    pub fn tenant(&self) -> Option<&TenantLabel> {
        self.tenant.as_ref()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<TenantLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|label| TenantLabel::new(label).ok()))
}

/// A point-in-time view of the session provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// Provider has not resolved the session yet.
    pub fn loading() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
