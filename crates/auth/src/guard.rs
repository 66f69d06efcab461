//! Access guard for protected views.
//!
//! [`AccessGuard::evaluate`] is a pure function of the current session and
//! the view's declared roles. [`ProtectedView`] wraps it with the one side
//! effect the guard owns: telling the user why they were turned away (once
//! per transition) and keeping them off the protected view.

use serde::Serialize;

use crate::roles::Role;
use crate::routes::RouteId;
use crate::session::SessionSnapshot;

/// Guard state, in evaluation priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    Loading,
    Unauthenticated,
    Inactive,
    RoleDenied,
    Authorized,
}

/// Why a view was refused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    SignInRequired,
    AccountDisabled,
    InsufficientPermission,
}

impl DenialReason {
    /// User-visible notice text.
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::SignInRequired => "please sign in",
            DenialReason::AccountDisabled => "account disabled",
            DenialReason::InsufficientPermission => "insufficient permission",
        }
    }
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// What the view layer should do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Show a neutral placeholder.
    Loading,
    /// Show the protected content.
    Render,
    Redirect { target: RouteId, reason: DenialReason },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct GuardOutcome {
    pub state: GuardState,
    pub decision: GuardDecision,
}

/// Navigation collaborator (the router).
pub trait Navigator {
    fn current_path(&self) -> &str;
    fn navigate(&mut self, route: RouteId);
}

/// Denial notification collaborator (toasts, banners).
pub trait Notifier {
    fn notify(&mut self, reason: DenialReason);
}

/// Role gate declared by a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    allowed: Vec<Role>,
    redirect_to: RouteId,
}

impl AccessGuard {
    /// Gate on `allowed`. An empty set admits any active identity.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        let mut allowed: Vec<Role> = allowed.into_iter().collect();
        allowed.sort();
        allowed.dedup();
        Self {
            allowed,
            redirect_to: RouteId::Entry,
        }
    }

    /// Gate on free-form role names.
    pub fn for_roles<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::new(names.into_iter().map(|n| Role::parse(n.as_ref())))
    }

    /// Admit any active identity.
    pub fn any_authenticated() -> Self {
        Self::new(Vec::new())
    }

    /// Send refused users to `route` instead of the entry view.
    pub fn redirect_to(mut self, route: RouteId) -> Self {
        self.redirect_to = route;
        self
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    /// Whether `role` passes the role gate.
    ///
    /// Elevated roles always pass. `Unknown` never matches a declared role,
    /// even if an unrecognized name was declared.
    pub fn admits(&self, role: Role) -> bool {
        role.is_elevated()
            || self.allowed.is_empty()
            || (role != Role::Unknown && self.allowed.binary_search(&role).is_ok())
    }

    /// Evaluate the guard. First matching rule wins.
    pub fn evaluate(&self, session: &SessionSnapshot) -> GuardOutcome {
        if session.loading {
            return GuardOutcome {
                state: GuardState::Loading,
                decision: GuardDecision::Loading,
            };
        }

        let Some(identity) = session.identity() else {
            return self.deny(GuardState::Unauthenticated, DenialReason::SignInRequired);
        };

        if !identity.active {
            return self.deny(GuardState::Inactive, DenialReason::AccountDisabled);
        }

        if !self.admits(identity.role()) {
            return self.deny(GuardState::RoleDenied, DenialReason::InsufficientPermission);
        }

        GuardOutcome {
            state: GuardState::Authorized,
            decision: GuardDecision::Render,
        }
    }

    fn deny(&self, state: GuardState, reason: DenialReason) -> GuardOutcome {
        GuardOutcome {
            state,
            decision: GuardDecision::Redirect {
                target: self.redirect_to,
                reason,
            },
        }
    }
}

/// A mounted protected view: the guard plus the last decision acted upon.
#[derive(Debug, Clone)]
pub struct ProtectedView {
    guard: AccessGuard,
    last: Option<GuardDecision>,
}

impl ProtectedView {
    pub fn new(guard: AccessGuard) -> Self {
        Self { guard, last: None }
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Re-evaluate after an upstream change and perform the side effects.
    ///
    /// The notice is shown only when the decision differs from the previous
    /// evaluation. Navigation happens on every refusal while the router is
    /// off the target, and never when it is already there.
    pub fn drive<N, T>(
        &mut self,
        session: &SessionSnapshot,
        navigator: &mut N,
        notifier: &mut T,
    ) -> GuardOutcome
    where
        N: Navigator + ?Sized,
        T: Notifier + ?Sized,
    {
        let outcome = self.guard.evaluate(session);
        let changed = self.last != Some(outcome.decision);
        self.last = Some(outcome.decision);

        if let GuardDecision::Redirect { target, reason } = outcome.decision {
            if changed {
                tracing::info!(state = ?outcome.state, %target, %reason, "access denied");
                notifier.notify(reason);
            }
            if !target.matches(navigator.current_path()) {
                navigator.navigate(target);
            }
        }

        outcome
    }
}
