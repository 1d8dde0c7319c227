use client_session::SessionSnapshot;
use tracing::debug;

use crate::routes::{RouteRequirements, RouteTable, LOGIN_PATH, PROFILE_PATH};

/// Terminal outcome of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the requested route.
    Allowed,
    /// Abandon the requested route and go to the target instead.
    Redirected(&'static str),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allowed)
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        match *self {
            GuardDecision::Allowed => None,
            GuardDecision::Redirected(target) => Some(target),
        }
    }
}

/// Evaluate a route's requirements against the session, in fixed priority
/// order: authentication, then guest-only, then roles. Every redirect is
/// terminal; evaluation stops at the first failing check.
pub fn evaluate(requirements: &RouteRequirements, session: &SessionSnapshot) -> GuardDecision {
    if requirements.requires_auth && !session.authenticated {
        return GuardDecision::Redirected(LOGIN_PATH);
    }
    if requirements.requires_guest && session.authenticated {
        return GuardDecision::Redirected(PROFILE_PATH);
    }
    for required in requirements.required_roles {
        if session.role != Some(*required) {
            debug!(role = ?session.role, required = %required, "role check failed, redirecting");
            return GuardDecision::Redirected(PROFILE_PATH);
        }
    }
    GuardDecision::Allowed
}

/// Run one navigation attempt against a table: a route-level redirect wins
/// outright, then the requirement checks run. Paths matching no route carry
/// no requirements and are allowed through for the view layer to handle.
pub fn decide(table: &RouteTable, path: &str, session: &SessionSnapshot) -> GuardDecision {
    let Some(found) = table.resolve(path) else {
        return GuardDecision::Allowed;
    };
    if let Some(target) = found.route.redirect {
        return GuardDecision::Redirected(target);
    }
    evaluate(&found.route.requirements, session)
}
