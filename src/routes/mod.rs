//! Client-side route table and navigation resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each view declares an access level. Public views render unconditionally;
//! guest-only and authenticated views go through `guard::guard` with the
//! current session.


pub mod guard;

use std::fmt;

use guard::Decision;

use crate::state::session::Session;

/// Every view the client knows about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    AllPosts,
    ActivePosts,
    InactivePosts,
    AddPost,
    EditPost { post_id: String },
    Post { post_id: String },
}

/// Who may see a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Not wrapped by the guard.
    Public,
    /// Only when logged out (login, signup).
    Guest,
    /// Only when logged in.
    Authenticated,
}

impl Route {
    /// Match a browser path (query string and fragment ignored, trailing
    /// slash tolerated). `None` for unknown paths.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = pathname(path).split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["signup"] => Some(Self::Signup),
            ["all-posts"] => Some(Self::AllPosts),
            ["active-posts"] => Some(Self::ActivePosts),
            ["inactive-posts"] => Some(Self::InactivePosts),
            ["add-post"] => Some(Self::AddPost),
            ["edit-post", id] => Some(Self::EditPost { post_id: (*id).to_owned() }),
            ["post", id] => Some(Self::Post { post_id: (*id).to_owned() }),
            _ => None,
        }
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::Home | Self::Post { .. } => Access::Public,
            Self::Login | Self::Signup => Access::Guest,
            Self::AllPosts | Self::ActivePosts | Self::InactivePosts | Self::AddPost | Self::EditPost { .. } => {
                Access::Authenticated
            }
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Signup => "/signup".to_owned(),
            Self::AllPosts => "/all-posts".to_owned(),
            Self::ActivePosts => "/active-posts".to_owned(),
            Self::InactivePosts => "/inactive-posts".to_owned(),
            Self::AddPost => "/add-post".to_owned(),
            Self::EditPost { post_id } => format!("/edit-post/{post_id}"),
            Self::Post { post_id } => format!("/post/{post_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Result of navigating to a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect { to: &'static str, from: Option<String> },
    NotFound,
}

/// `path` without its query string and fragment.
fn pathname(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Resolve `path` against the route table and, for gated views, the guard.
/// A redirect to login remembers the path as requested.
#[must_use]
pub fn resolve(path: &str, session: &Session) -> Navigation {
    let Some(route) = Route::parse(path) else {
        return Navigation::NotFound;
    };
    let require_authenticated = match route.access() {
        Access::Public => return Navigation::Render(route),
        Access::Guest => false,
        Access::Authenticated => true,
    };
    match guard::guard(require_authenticated, session, pathname(path)) {
        Decision::Render => Navigation::Render(route),
        Decision::Redirect { to, from } => Navigation::Redirect { to, from },
    }
}
