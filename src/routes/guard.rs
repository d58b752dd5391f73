//! Route guard: decides whether a gated view renders or redirects.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Outcome of consulting the guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Render,
    /// Navigate to `to`. `from` is the originally requested path, kept so the
    /// login view can send the user back after authenticating.
    Redirect { to: &'static str, from: Option<String> },
}

/// Pure function of its inputs.
///
/// | `require_authenticated` | `session.status()` | decision |
/// |---|---|---|
/// | true | false | redirect to `/login`, remembering `target_path` |
/// | false | true | redirect to `/` |
/// | otherwise | | render |
#[must_use]
pub fn guard(require_authenticated: bool, session: &Session, target_path: &str) -> Decision {
    match (require_authenticated, session.status()) {
        (true, false) => Decision::Redirect { to: LOGIN_PATH, from: Some(target_path.to_owned()) },
        (false, true) => Decision::Redirect { to: HOME_PATH, from: None },
        _ => Decision::Render,
    }
}
