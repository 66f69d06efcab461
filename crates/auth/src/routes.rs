//! Views and per-role landing routes.

use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// A routable view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteId {
    /// Public sign-in view; target of every guard redirect.
    Entry,
    Root,
    /// General dashboard; landing view for roles without a dedicated desk.
    Dashboard,
    SuperAdmin,
    Admin,
    Reception,
    Lab,
    Radiology,
    Pharmacy,
    Doctor,
    Nursing,
    Accounts,
    Marketing,
}

impl RouteId {
    pub const ALL: [RouteId; 13] = [
        RouteId::Entry,
        RouteId::Root,
        RouteId::Dashboard,
        RouteId::SuperAdmin,
        RouteId::Admin,
        RouteId::Reception,
        RouteId::Lab,
        RouteId::Radiology,
        RouteId::Pharmacy,
        RouteId::Doctor,
        RouteId::Nursing,
        RouteId::Accounts,
        RouteId::Marketing,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            RouteId::Entry => "/login",
            RouteId::Root => "/",
            RouteId::Dashboard => "/dashboard",
            RouteId::SuperAdmin => "/super-admin",
            RouteId::Admin => "/admin",
            RouteId::Reception => "/reception",
            RouteId::Lab => "/lab",
            RouteId::Radiology => "/radiology",
            RouteId::Pharmacy => "/pharmacy",
            RouteId::Doctor => "/doctor",
            RouteId::Nursing => "/nursing",
            RouteId::Accounts => "/accounts",
            RouteId::Marketing => "/marketing",
        }
    }

    /// Resolve a path to a route. A single trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<RouteId> {
        let path = match path.strip_suffix('/') {
            Some("") | None => path,
            Some(stripped) => stripped,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Whether `path` names this route.
    pub fn matches(&self, path: &str) -> bool {
        Self::from_path(path) == Some(*self)
    }

    /// Views a freshly signed-in user may be parked on before being sent to
    /// their own landing view.
    pub fn is_neutral(&self) -> bool {
        matches!(self, RouteId::Root | RouteId::Dashboard)
    }
}

impl core::fmt::Display for RouteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

impl Role {
    /// Landing view after sign-in.
    pub fn default_route(&self) -> RouteId {
        match self {
            Role::SuperAdmin => RouteId::SuperAdmin,
            Role::Admin => RouteId::Admin,
            Role::Reception => RouteId::Reception,
            Role::Lab => RouteId::Lab,
            Role::Radiology => RouteId::Radiology,
            Role::Pharmacy => RouteId::Pharmacy,
            Role::Doctor => RouteId::Doctor,
            Role::Nurse => RouteId::Nursing,
            Role::Accountant => RouteId::Accounts,
            Role::MarketingManager => RouteId::Marketing,
            Role::User | Role::Unknown => RouteId::Dashboard,
        }
    }

    /// Human-readable name of [`Role::default_route`].
    pub fn default_route_label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin Dashboard",
            Role::Admin => "Admin Dashboard",
            Role::Reception => "Reception Desk",
            Role::Lab => "Laboratory",
            Role::Radiology => "Radiology",
            Role::Pharmacy => "Pharmacy",
            Role::Doctor => "Doctor Workspace",
            Role::Nurse => "Nursing Station",
            Role::Accountant => "Accounts",
            Role::MarketingManager => "Marketing",
            Role::User | Role::Unknown => "Dashboard",
        }
    }
}

/// Landing view for a free-form role. Total: unknown input gets the dashboard.
pub fn default_route(role: &str) -> RouteId {
    Role::parse(role).default_route()
}

pub fn default_route_label(role: &str) -> &'static str {
    Role::parse(role).default_route_label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn desks_land_on_their_own_view() {
        assert_eq!(default_route("reception"), RouteId::Reception);
        assert_eq!(default_route("Doctor"), RouteId::Doctor);
        assert_eq!(default_route("superadmin"), RouteId::SuperAdmin);
        assert_eq!(default_route("nurse").path(), "/nursing");
        assert_eq!(default_route_label("LAB"), "Laboratory");
    }

    #[test]
    fn unknown_roles_land_on_dashboard() {
        assert_eq!(default_route(""), RouteId::Dashboard);
        assert_eq!(default_route("janitor"), RouteId::Dashboard);
        assert_eq!(default_route("user"), RouteId::Dashboard);
        assert_eq!(default_route_label("janitor"), "Dashboard");
    }

    #[test]
    fn paths_resolve_back_to_routes() {
        for route in RouteId::ALL {
            assert_eq!(RouteId::from_path(route.path()), Some(route));
        }
        assert_eq!(RouteId::from_path("/dashboard/"), Some(RouteId::Dashboard));
        assert_eq!(RouteId::from_path("/"), Some(RouteId::Root));
        assert_eq!(RouteId::from_path("/patients/42"), None);
        assert!(RouteId::Entry.matches("/login/"));
    }

    #[test]
    fn only_root_and_dashboard_are_neutral() {
        let neutral: Vec<_> = RouteId::ALL.into_iter().filter(RouteId::is_neutral).collect();
        assert_eq!(neutral, vec![RouteId::Root, RouteId::Dashboard]);
    }

    proptest! {
        /// Property: the resolver is total and agrees with the typed table.
        #[test]
        fn default_route_is_total(input in ".{0,32}") {
            let route = default_route(&input);
            prop_assert!(RouteId::ALL.contains(&route));
            prop_assert_eq!(route, Role::parse(&input).default_route());
            prop_assert!(!default_route_label(&input).is_empty());
        }
    }
}
