//! Route guarding based on the session state

use super::{Identity, SessionState};

/// Top-level areas of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Task assignment, approval and staff management
    Admin,
    /// A staff member's own active task
    Worker,
}

/// What the presentation layer should do for a requested area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session not restored yet; show a placeholder
    Loading,
    RedirectToLogin,
    Redirect(Area),
    Render,
}

/// Landing area for a freshly signed-in user.
pub fn home_area(identity: &Identity) -> Area {
    if identity.is_privileged {
        Area::Admin
    } else {
        Area::Worker
    }
}

pub fn guard(state: &SessionState, requested: Area) -> GuardOutcome {
    match state {
        SessionState::Uninitialized => GuardOutcome::Loading,
        SessionState::Anonymous => GuardOutcome::RedirectToLogin,
        SessionState::Authenticated(identity) => {
            let home = home_area(identity);
            if home == requested {
                GuardOutcome::Render
            } else {
                GuardOutcome::Redirect(home)
            }
        }
    }
}
