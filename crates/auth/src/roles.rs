//! Role taxonomy.
//!
//! Roles arrive from the session provider as free-form strings. They are
//! normalized exactly once, here, into the closed [`Role`] set. Anything that
//! does not match a known role becomes [`Role::Unknown`], which is granted
//! nothing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A recognized role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Cross-tenant administrator. The only elevated role.
    SuperAdmin,
    /// Hospital administrator (tenant-scoped).
    Admin,
    Reception,
    Lab,
    Radiology,
    Pharmacy,
    Doctor,
    Nurse,
    Accountant,
    /// Generic signed-in user.
    User,
    MarketingManager,
    /// Any unrecognized input. Least privileged.
    Unknown,
}

impl Role {
    /// Every role, in matrix row order.
    pub const ALL: [Role; 12] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Reception,
        Role::Lab,
        Role::Radiology,
        Role::Pharmacy,
        Role::Doctor,
        Role::Nurse,
        Role::Accountant,
        Role::User,
        Role::MarketingManager,
        Role::Unknown,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    /// Normalize free-form input into a role.
    ///
    /// Case-insensitive; surrounding whitespace is ignored and `-` or inner
    /// spaces are treated as `_`. Never fails.
    pub fn parse(input: &str) -> Role {
        let trimmed = input.trim();
        // Fast path: already canonical (no allocation).
        if let Some(role) = Self::from_canonical(trimmed) {
            return role;
        }

        let normalized: String = trimmed
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::from_canonical(&normalized).unwrap_or(Role::Unknown)
    }

    fn from_canonical(s: &str) -> Option<Role> {
        let role = match s {
            "super_admin" | "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "reception" | "receptionist" => Role::Reception,
            "lab" | "laboratory" => Role::Lab,
            "radiology" => Role::Radiology,
            "pharmacy" | "pharmacist" => Role::Pharmacy,
            "doctor" => Role::Doctor,
            "nurse" => Role::Nurse,
            "accountant" | "accounts" => Role::Accountant,
            "user" | "generic_user" => Role::User,
            "marketing_manager" | "marketingmanager" | "marketing" => Role::MarketingManager,
            _ => return None,
        };
        Some(role)
    }

    /// Canonical lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Reception => "reception",
            Role::Lab => "lab",
            Role::Radiology => "radiology",
            Role::Pharmacy => "pharmacy",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Accountant => "accountant",
            Role::User => "user",
            Role::MarketingManager => "marketing_manager",
            Role::Unknown => "unknown",
        }
    }

    /// Elevated roles bypass both the permission matrix and tenant filtering.
    ///
    /// This is the only place elevation is decided; every other component
    /// calls it instead of comparing role names.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Tenant-scoped roles only see records of their own tenant.
    pub fn is_tenant_scoped(&self) -> bool {
        !self.is_elevated()
    }

    pub(crate) const fn index(&self) -> usize {
        *self as usize
    }
}

/// String-boundary form of [`Role::is_elevated`].
pub fn is_elevated(role: &str) -> bool {
    Role::parse(role).is_elevated()
}

/// String-boundary form of [`Role::is_tenant_scoped`].
pub fn is_tenant_scoped(role: &str) -> bool {
    Role::parse(role).is_tenant_scoped()
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}
