//! Post-authentication landing redirect.
//!
//! Fires on a change of `(authenticated, current path)`, never on a plain
//! re-render. A signed-in user parked on a neutral view (`/`, `/dashboard`)
//! is sent to their role's landing view. A deactivated identity counts as
//! signed out here; the access guard handles it. Because the same pair is never acted
//! on twice, a role whose landing view is itself neutral cannot loop.

use crate::guard::Navigator;
use crate::routes::RouteId;
use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Default)]
pub struct LandingRedirector {
    last: Option<(bool, String)>,
}

impl LandingRedirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state and return the landing view to navigate to,
    /// if this transition calls for one.
    pub fn observe(&mut self, session: &SessionSnapshot, current_path: &str) -> Option<RouteId> {
        let authenticated = session.is_authenticated()
            && session.identity().is_some_and(|identity| identity.active);
        let unchanged = matches!(
            &self.last,
            Some((was_authenticated, path)) if *was_authenticated == authenticated && path == current_path
        );
        if unchanged {
            return None;
        }
        self.last = Some((authenticated, current_path.to_string()));

        if !authenticated {
            return None;
        }
        let current = RouteId::from_path(current_path).filter(RouteId::is_neutral)?;
        let target = session.identity()?.role().default_route();
        (target != current).then_some(target)
    }

    /// Observe the navigator's current path and navigate if needed.
    pub fn drive<N: Navigator + ?Sized>(
        &mut self,
        session: &SessionSnapshot,
        navigator: &mut N,
    ) -> Option<RouteId> {
        let target = self.observe(session, navigator.current_path())?;
        tracing::info!(%target, "redirecting to landing view");
        navigator.navigate(target);
        Some(target)
    }
}
