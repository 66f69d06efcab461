//! Tenant filter derivation.
//!
//! Tenant-scoped roles only ever see records whose tenant field equals their
//! own tenant label. This module produces that predicate; it never runs a
//! query.

use careflow_core::TenantLabel;

use crate::roles::Role;

/// Tenant used when a tenant-scoped identity carries no label.
pub const DEFAULT_FALLBACK_TENANT: TenantLabel = TenantLabel::from_static("hope");

/// Record field holding the owning tenant.
pub const DEFAULT_TENANT_FIELD: &str = "hospital_name";

/// Row-level tenant constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantFilter {
    /// No constraint. Only produced for elevated roles.
    Unrestricted,
    /// Records must belong to exactly this tenant.
    EqualsTenant(TenantLabel),
}

impl TenantFilter {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, TenantFilter::Unrestricted)
    }

    pub fn tenant(&self) -> Option<&TenantLabel> {
        match self {
            TenantFilter::Unrestricted => None,
            TenantFilter::EqualsTenant(label) => Some(label),
        }
    }
}

/// A query under construction that accepts equality constraints.
///
/// Implemented by whatever builder the data layer uses.
pub trait TenantQuery: Sized {
    /// Return the builder with `field == value` added.
    fn with_equality(self, field: &str, value: &str) -> Self;

    /// Value of the first equality constraint on `field`, if any.
    fn equality_on(&self, field: &str) -> Option<&str>;

    /// Whether any constraint on `field` already requires `value`.
    fn has_equality(&self, field: &str, value: &str) -> bool;
}

/// Ordered list of `field == value` constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EqualityQuery {
    constraints: Vec<(String, String)>,
}

impl EqualityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[(String, String)] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl TenantQuery for EqualityQuery {
    fn with_equality(mut self, field: &str, value: &str) -> Self {
        self.constraints.push((field.to_string(), value.to_string()));
        self
    }

    fn equality_on(&self, field: &str) -> Option<&str> {
        self.constraints
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    fn has_equality(&self, field: &str, value: &str) -> bool {
        self.constraints
            .iter()
            .any(|(f, v)| f == field && v == value)
    }
}

/// Tenant scoping policy: the fallback tenant and the field it constrains.
///
/// Build one from configuration and share it; call sites must not invent
/// their own fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    fallback_tenant: TenantLabel,
    field: String,
}

impl TenantScope {
    pub fn new(fallback_tenant: TenantLabel, field: impl Into<String>) -> Self {
        Self {
            fallback_tenant,
            field: field.into(),
        }
    }

    pub fn fallback_tenant(&self) -> &TenantLabel {
        &self.fallback_tenant
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Derive the filter for `role` acting with `tenant`.
    pub fn filter(&self, role: Role, tenant: Option<&TenantLabel>) -> TenantFilter {
        if role.is_elevated() {
            return TenantFilter::Unrestricted;
        }

        match tenant {
            Some(label) => TenantFilter::EqualsTenant(label.clone()),
            None => {
                tracing::warn!(
                    %role,
                    fallback = %self.fallback_tenant,
                    "identity has no tenant label; using fallback tenant"
                );
                TenantFilter::EqualsTenant(self.fallback_tenant.clone())
            }
        }
    }

    /// String-boundary form of [`TenantScope::filter`].
    pub fn filter_for(&self, role: &str, tenant: Option<&TenantLabel>) -> TenantFilter {
        self.filter(Role::parse(role), tenant)
    }

    /// Constrain `query` to the tenant visible to `role`.
    ///
    /// Idempotent: if any constraint on the field already requires this
    /// tenant the query is returned unchanged. A conflicting constraint
    /// already present is kept and the new one is added once, so the
    /// conjunction matches nothing.
    pub fn apply<Q: TenantQuery>(&self, query: Q, role: Role, tenant: Option<&TenantLabel>) -> Q {
        let TenantFilter::EqualsTenant(label) = self.filter(role, tenant) else {
            return query;
        };

        if query.has_equality(&self.field, label.as_str()) {
            return query;
        }
        if let Some(existing) = query.equality_on(&self.field) {
            tracing::warn!(
                field = %self.field,
                existing,
                tenant = %label,
                "query already constrained to a different tenant"
            );
        }
        query.with_equality(&self.field, label.as_str())
    }
}

impl Default for TenantScope {
    fn default() -> Self {
        Self {
            fallback_tenant: DEFAULT_FALLBACK_TENANT,
            field: DEFAULT_TENANT_FIELD.to_string(),
        }
    }
}

/// Whether `role` belonging to `own` may touch data of `target`.
///
/// Used for direct lookups by identifier, outside query construction.
pub fn can_access_tenant_data(role: Role, own: &TenantLabel, target: &TenantLabel) -> bool {
    role.is_elevated() || own == target
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn label(s: &str) -> TenantLabel {
        TenantLabel::new(s).unwrap()
    }

    fn any_scoped_role() -> impl Strategy<Value = Role> {
        proptest::sample::select(
            Role::ALL
                .into_iter()
                .filter(|r| r.is_tenant_scoped())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn doctor_is_scoped_to_own_hospital() {
        let scope = TenantScope::default();
        assert_eq!(
            scope.filter_for("doctor", Some(&label("hope"))),
            TenantFilter::EqualsTenant(label("hope"))
        );
    }

    #[test]
    fn super_admin_is_unrestricted() {
        let scope = TenantScope::default();
        for alias in ["super_admin", "superadmin"] {
            assert!(scope.filter_for(alias, Some(&label("ayushman"))).is_unrestricted());
            assert!(scope.filter_for(alias, None).is_unrestricted());
        }
    }

    #[test]
    fn missing_label_uses_configured_fallback() {
        let scope = TenantScope::new(label("ayushman"), "hospital_name");
        assert_eq!(
            scope.filter(Role::Nurse, None),
            TenantFilter::EqualsTenant(label("ayushman"))
        );
        assert_eq!(
            TenantScope::default().filter(Role::Unknown, None).tenant(),
            Some(&DEFAULT_FALLBACK_TENANT)
        );
    }

    #[test]
    fn apply_adds_one_constraint_for_scoped_roles() {
        let scope = TenantScope::default();
        let query = scope.apply(EqualityQuery::new(), Role::Lab, Some(&label("hope")));
        assert_eq!(
            query.constraints(),
            &[("hospital_name".to_string(), "hope".to_string())]
        );

        let query = scope.apply(EqualityQuery::new(), Role::SuperAdmin, Some(&label("hope")));
        assert!(query.is_empty());
    }

    #[test]
    fn apply_keeps_conflicting_constraint() {
        let scope = TenantScope::default();
        let query = EqualityQuery::new().with_equality("hospital_name", "ayushman");
        let query = scope.apply(query, Role::Lab, Some(&label("hope")));
        assert_eq!(query.constraints().len(), 2);
    }

    #[test]
    fn reapplying_over_conflicting_constraint_adds_nothing() {
        let scope = TenantScope::default();
        let tenant = label("hope");
        let start = EqualityQuery::new().with_equality("hospital_name", "ayushman");

        let once = scope.apply(start, Role::Lab, Some(&tenant));
        let twice = scope.apply(once.clone(), Role::Lab, Some(&tenant));
        let thrice = scope.apply(twice.clone(), Role::Lab, Some(&tenant));

        assert_eq!(
            once.constraints(),
            &[
                ("hospital_name".to_string(), "ayushman".to_string()),
                ("hospital_name".to_string(), "hope".to_string()),
            ]
        );
        assert_eq!(once, twice);
        assert_eq!(twice, thrice);
    }

    #[test]
    fn cross_tenant_access() {
        let hope = label("hope");
        let ayushman = label("ayushman");
        assert!(can_access_tenant_data(Role::Doctor, &hope, &hope));
        assert!(!can_access_tenant_data(Role::Doctor, &hope, &ayushman));
        assert!(can_access_tenant_data(Role::SuperAdmin, &hope, &ayushman));
    }

    proptest! {
        /// Property: tenant-scoped roles never cross tenants.
        #[test]
        fn scoped_roles_stay_in_their_tenant(
            role in any_scoped_role(),
            a in "[a-z]{1,8}",
            b in "[a-z]{1,8}",
        ) {
            let (a, b) = (label(&a), label(&b));
            prop_assert!(can_access_tenant_data(role, &a, &a));
            prop_assert_eq!(can_access_tenant_data(role, &a, &b), a == b);
        }

        /// Property: applying the filter twice is the same as applying it once.
        #[test]
        fn apply_is_idempotent(
            role in proptest::sample::select(Role::ALL.to_vec()),
            tenant in proptest::option::of("[a-z]{1,8}"),
            existing in proptest::collection::vec(
                (proptest::sample::select(vec!["hospital_name", "ward"]), "[a-z]{1,8}"),
                0..4,
            ),
        ) {
            let scope = TenantScope::default();
            let tenant = tenant.map(|t| label(&t));
            let start = existing
                .iter()
                .fold(EqualityQuery::new(), |q, (field, value)| q.with_equality(field, value));
            let once = scope.apply(start, role, tenant.as_ref());
            let twice = scope.apply(once.clone(), role, tenant.as_ref());
            prop_assert_eq!(once, twice);
        }
    }
}
