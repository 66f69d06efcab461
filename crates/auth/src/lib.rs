//! `careflow-auth` — authorization and tenant scoping for the hospital suite.
//!
//! Everything here is a pure decision over explicit inputs: no I/O, no
//! ambient session state. The guard and landing redirector are the only
//! stateful pieces and they act through caller-supplied collaborators.

pub mod authorize;
pub mod config;
pub mod error;
pub mod guard;
pub mod landing;
pub mod matrix;
pub mod permissions;
pub mod roles;
pub mod routes;
pub mod session;
pub mod tenant;

pub use authorize::{
    AuthorizationExplanation, DecisionBasis, MatrixReport, RoleGrants, explain_authorization,
};
pub use config::{Authorizer, AuthzConfig};
pub use error::{ConfigError, ConfigResult};
pub use guard::{
    AccessGuard, DenialReason, GuardDecision, GuardOutcome, GuardState, Navigator, Notifier,
    ProtectedView,
};
pub use landing::LandingRedirector;
pub use matrix::{
    Capability, MatrixDocument, PermissionMatrix, can_delete_masters, can_delete_records,
    can_edit_masters, can_manage_users, has_permission,
};
pub use permissions::{Action, ActionSet, Module, denial_tooltip};
pub use roles::{Role, is_elevated, is_tenant_scoped};
pub use routes::{RouteId, default_route, default_route_label};
pub use session::{Identity, SessionSnapshot};
pub use tenant::{
    EqualityQuery, TenantFilter, TenantQuery, TenantScope, can_access_tenant_data,
};

pub use careflow_core::TenantLabel;
