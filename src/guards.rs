//! Route guards over the session store. Guards never redirect while hydration
//! is pending so a persisted session is not mistaken for a logged-out one.

use crate::api::types::Role;
use crate::session::SessionStore;

/// What a guarded route should do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hydration has not finished; render nothing and re-evaluate.
    Pending,
    Allow,
    RedirectToLogin,
}

/// Guard for routes that require any authenticated user.
#[must_use]
pub fn require_auth(store: &SessionStore) -> GuardDecision {
    if !store.has_hydrated() {
        return GuardDecision::Pending;
    }
    if store.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToLogin
    }
}

/// Guard for host-only routes. Drivers are redirected; sellers and operators
/// pass through.
#[must_use]
pub fn require_seller(store: &SessionStore) -> GuardDecision {
    match require_auth(store) {
        GuardDecision::Allow => {
            let is_seller = store.user().is_some_and(|user| user.role.is_seller());
            if is_seller {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToLogin
            }
        }
        decision => decision,
    }
}

/// Guard for operator dashboards.
#[must_use]
pub fn require_operator(store: &SessionStore) -> GuardDecision {
    match require_auth(store) {
        GuardDecision::Allow => {
            let is_operator = store
                .user()
                .is_some_and(|user| user.role == Role::OperatorB2b);
            if is_operator {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectToLogin
            }
        }
        decision => decision,
    }
}
