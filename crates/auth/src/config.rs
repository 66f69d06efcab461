//! Engine configuration and the configured [`Authorizer`].
//!
//! Configuration is read once at start-up (JSON or environment variables)
//! and turned into an `Authorizer`, which every call site shares. This keeps
//! the fallback tenant a single value instead of one literal per caller.

use std::path::Path;

use serde::Deserialize;

use careflow_core::TenantLabel;

use crate::authorize::{AuthorizationExplanation, MatrixReport, explain_authorization};
use crate::error::{ConfigError, ConfigResult};
use crate::guard::AccessGuard;
use crate::matrix::{MatrixDocument, PermissionMatrix};
use crate::permissions::{Action, Module};
use crate::roles::Role;
use crate::routes::RouteId;
use crate::session::Identity;
use crate::tenant::{
    DEFAULT_FALLBACK_TENANT, DEFAULT_TENANT_FIELD, TenantFilter, TenantQuery, TenantScope,
    can_access_tenant_data,
};

pub const ENV_FALLBACK_TENANT: &str = "CAREFLOW_FALLBACK_TENANT";
pub const ENV_TENANT_FIELD: &str = "CAREFLOW_TENANT_FIELD";
pub const ENV_ENTRY_PATH: &str = "CAREFLOW_ENTRY_PATH";
pub const ENV_PERMISSIONS_FILE: &str = "CAREFLOW_PERMISSIONS_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzConfig {
    /// Tenant assumed for tenant-scoped identities that carry none.
    pub fallback_tenant: TenantLabel,
    /// Record field that holds the owning tenant.
    pub tenant_field: String,
    /// Where the guard sends refused users.
    pub entry_route: RouteId,
    /// Grant document replacing the standard matrix.
    pub permissions: Option<MatrixDocument>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            fallback_tenant: DEFAULT_FALLBACK_TENANT,
            tenant_field: DEFAULT_TENANT_FIELD.to_string(),
            entry_route: RouteId::Entry,
            permissions: None,
        }
    }
}

impl AuthzConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(ENV_FALLBACK_TENANT) {
            Some(raw) => config.fallback_tenant = TenantLabel::new(raw)?,
            None => tracing::warn!(
                fallback = %config.fallback_tenant,
                "{ENV_FALLBACK_TENANT} not set; using default fallback tenant"
            ),
        }

        if let Some(field) = lookup(ENV_TENANT_FIELD) {
            config.tenant_field = checked_field(field)?;
        }

        if let Some(path) = lookup(ENV_ENTRY_PATH) {
            config.entry_route =
                RouteId::from_path(&path).ok_or(ConfigError::UnknownRoute(path))?;
        }

        if let Some(path) = lookup(ENV_PERMISSIONS_FILE) {
            let raw = read_file(Path::new(&path))?;
            config.permissions = Some(serde_json::from_str(&raw)?);
        }

        Ok(config)
    }

    /// Validate the configuration and build the shared [`Authorizer`].
    pub fn build(&self) -> ConfigResult<Authorizer> {
        let field = checked_field(self.tenant_field.clone())?;
        let matrix = match &self.permissions {
            Some(document) => PermissionMatrix::from_document(document)?,
            None => PermissionMatrix::standard(),
        };
        let scope = TenantScope::new(self.fallback_tenant.clone(), field);

        tracing::debug!(
            fallback = %scope.fallback_tenant(),
            field = scope.field(),
            entry = %self.entry_route,
            custom_matrix = self.permissions.is_some(),
            "authorizer configured"
        );

        Ok(Authorizer::new(matrix, scope, self.entry_route))
    }
}

fn checked_field(field: String) -> ConfigResult<String> {
    if field.trim().is_empty() {
        return Err(ConfigError::BlankTenantField);
    }
    Ok(field)
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Configured engine: one matrix, one tenant scope, one entry view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorizer {
    matrix: PermissionMatrix,
    scope: TenantScope,
    entry_route: RouteId,
}

impl Authorizer {
    pub fn new(matrix: PermissionMatrix, scope: TenantScope, entry_route: RouteId) -> Self {
        Self {
            matrix,
            scope,
            entry_route,
        }
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    pub fn scope(&self) -> &TenantScope {
        &self.scope
    }

    pub fn entry_route(&self) -> RouteId {
        self.entry_route
    }

    pub fn has_permission(&self, role: &str, module: &str, action: &str) -> bool {
        self.matrix.check(role, module, action)
    }

    pub fn tenant_filter(&self, identity: &Identity) -> TenantFilter {
        self.scope.filter(identity.role(), identity.tenant())
    }

    pub fn apply_tenant_filter<Q: TenantQuery>(&self, query: Q, identity: &Identity) -> Q {
        self.scope.apply(query, identity.role(), identity.tenant())
    }

    /// Whether `identity` may read or write a record owned by `target`.
    ///
    /// An identity without a tenant label is treated as belonging to the
    /// fallback tenant, consistent with [`Authorizer::tenant_filter`].
    pub fn can_access_tenant_data(&self, identity: &Identity, target: &TenantLabel) -> bool {
        let own = identity.tenant().unwrap_or(self.scope.fallback_tenant());
        can_access_tenant_data(identity.role(), own, target)
    }

    /// Guard for a view admitting `roles`, redirecting to the entry view.
    pub fn guard<S: AsRef<str>>(&self, roles: impl IntoIterator<Item = S>) -> AccessGuard {
        AccessGuard::for_roles(roles).redirect_to(self.entry_route)
    }

    pub fn explain(&self, role: &str, module: Module, action: Action) -> AuthorizationExplanation {
        explain_authorization(&self.matrix, Role::parse(role), module, action)
    }

    pub fn report(&self) -> MatrixReport {
        MatrixReport::from_matrix(&self.matrix)
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new(
            PermissionMatrix::standard(),
            TenantScope::default(),
            RouteId::Entry,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tenant::EqualityQuery;

    fn label(s: &str) -> TenantLabel {
        TenantLabel::new(s).unwrap()
    }

    #[test]
    fn defaults_match_standard_engine() {
        let authorizer = AuthzConfig::default().build().unwrap();
        assert_eq!(authorizer, Authorizer::default());
        assert_eq!(authorizer.scope().fallback_tenant().as_str(), "hope");
        assert_eq!(authorizer.scope().field(), "hospital_name");
    }

    #[test]
    fn json_config_with_custom_matrix() {
        let config = AuthzConfig::from_json_str(
            r#"{
                "fallback_tenant": "ayushman",
                "entry_route": "root",
                "permissions": { "reception": { "patients": ["view"] } }
            }"#,
        )
        .unwrap();
        let authorizer = config.build().unwrap();

        assert!(authorizer.has_permission("reception", "patients", "view"));
        assert!(!authorizer.has_permission("reception", "patients", "create"));
        assert!(!authorizer.has_permission("admin", "patients", "view"));
        assert!(authorizer.has_permission("super_admin", "users", "delete"));
        assert_eq!(authorizer.entry_route(), RouteId::Root);
        assert_eq!(
            authorizer.tenant_filter(&Identity::new("nurse")),
            TenantFilter::EqualsTenant(label("ayushman"))
        );
    }

    #[test]
    fn json_config_rejects_bad_input() {
        assert!(matches!(
            AuthzConfig::from_json_str(r#"{ "fallback_tenant": "" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            AuthzConfig::from_json_str(r#"{ "fallback": "hope" }"#),
            Err(ConfigError::Json(_))
        ));

        let config = AuthzConfig::from_json_str(
            r#"{ "permissions": { "reception": { "inventory": ["view"] } } }"#,
        )
        .unwrap();
        assert!(matches!(config.build(), Err(ConfigError::UnknownModule(_))));
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            (ENV_FALLBACK_TENANT, "ayushman"),
            (ENV_TENANT_FIELD, "hospital"),
            (ENV_ENTRY_PATH, "/"),
        ]
        .into_iter()
        .collect();

        let config =
            AuthzConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.fallback_tenant, label("ayushman"));
        assert_eq!(config.tenant_field, "hospital");
        assert_eq!(config.entry_route, RouteId::Root);
        assert!(config.permissions.is_none());
    }

    #[test]
    fn env_lookup_errors() {
        let err = AuthzConfig::from_lookup(|key| {
            (key == ENV_ENTRY_PATH).then(|| "/nowhere".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRoute(path) if path == "/nowhere"));

        let err = AuthzConfig::from_lookup(|key| {
            (key == ENV_FALLBACK_TENANT).then(|| "  ".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTenant(_)));

        let err = AuthzConfig::from_lookup(|key| {
            (key == ENV_PERMISSIONS_FILE).then(|| "/definitely/not/here.json".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let err = AuthzConfig::from_lookup(|key| (key == ENV_TENANT_FIELD).then(String::new))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BlankTenantField));
    }

    #[test]
    fn blank_tenant_field_in_json_is_rejected_at_build() {
        for field in ["", "  "] {
            let config = AuthzConfig::from_json_str(&format!(r#"{{ "tenant_field": "{field}" }}"#))
                .unwrap();
            assert!(matches!(config.build(), Err(ConfigError::BlankTenantField)));
        }
    }

    #[test]
    fn missing_tenant_label_is_treated_as_fallback_for_direct_lookups() {
        let authorizer = Authorizer::default();
        let unlabelled = Identity::new("doctor");
        assert!(authorizer.can_access_tenant_data(&unlabelled, &label("hope")));
        assert!(!authorizer.can_access_tenant_data(&unlabelled, &label("ayushman")));

        let labelled = Identity::new("doctor").with_tenant(label("ayushman"));
        assert!(authorizer.can_access_tenant_data(&labelled, &label("ayushman")));
    }

    #[test]
    fn apply_uses_configured_field() {
        let authorizer = AuthzConfig {
            tenant_field: "tenant".to_string(),
            ..AuthzConfig::default()
        }
        .build()
        .unwrap();
        let identity = Identity::new("lab").with_tenant(label("hope"));
        let query = authorizer.apply_tenant_filter(EqualityQuery::new(), &identity);
        assert_eq!(query.equality_on("tenant"), Some("hope"));
    }

    #[test]
    fn guard_redirects_to_configured_entry() {
        let authorizer = Authorizer::new(
            PermissionMatrix::standard(),
            TenantScope::default(),
            RouteId::Root,
        );
        let guard = authorizer.guard(["doctor"]);
        let outcome = guard.evaluate(&crate::session::SessionSnapshot::signed_out());
        assert!(matches!(
            outcome.decision,
            crate::guard::GuardDecision::Redirect { target: RouteId::Root, .. }
        ));
    }
}
