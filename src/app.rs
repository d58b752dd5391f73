//! Application shell: startup bootstrap, auth flows and navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is the object views and the CLI hold. It owns the `BlogApi` (and so
//! the one HTTP client with its cookie jar) and the `SessionStore`.
//!
//! DESIGN
//! ======
//! An `App` only exists after `bootstrap` has resolved, so the route guard
//! cannot be consulted while the session is still unknown. Requests are not
//! cancelled; a response that lands after its view is gone may still update
//! the session.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::future::Future;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::api::BlogApi;
use crate::net::transport::{HttpTransport, ReqwestTransport};
use crate::net::types::{Credentials, SignupForm, User};
use crate::routes::{self, Navigation};
use crate::state::session::{Session, SessionStore};

/// Resolve the current user once at startup.
///
/// Never fails: a user payload logs in, anything else (network error, 401
/// that survived refresh, empty payload, bad body) logs out.
pub async fn bootstrap<T: HttpTransport>(api: &BlogApi<T>, session: &SessionStore) -> Session {
    match api.current_user().await {
        Ok(Some(user)) => session.login(user),
        Ok(None) => {
            tracing::info!("no current user; starting logged out");
            session.logout();
        }
        Err(e) => {
            tracing::info!(error = %e, code = e.error_code(), "current user unavailable; starting logged out");
            session.logout();
        }
    }
    session.snapshot()
}

pub struct App<T = ReqwestTransport> {
    api: BlogApi<T>,
    session: SessionStore,
}

impl App<ReqwestTransport> {
    /// Build the HTTP client from `config` and bootstrap the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    /// Bootstrap failures are not errors; they leave the session logged out.
    pub async fn start(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        tracing::info!(base_url = %config.base_url, "starting blog client");
        Ok(Self::with_transport(transport).await)
    }
}

impl<T: HttpTransport> App<T> {
    /// Bootstrap over an already-built transport.
    pub async fn with_transport(transport: T) -> Self {
        Self::with_store(transport, SessionStore::new()).await
    }

    /// Bootstrap into an existing store, e.g. one observers already hold.
    pub async fn with_store(transport: T, session: SessionStore) -> Self {
        let api = BlogApi::new(transport);
        bootstrap(&api, &session).await;
        Self { api, session }
    }

    pub fn api(&self) -> &BlogApi<T> {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Route `path` through the route table and guard.
    pub fn navigate(&self, path: &str) -> Navigation {
        let navigation = routes::resolve(path, &self.session.snapshot());
        if let Navigation::Redirect { to, .. } = &navigation {
            tracing::debug!(path, to = *to, "navigation redirected");
        }
        navigation
    }

    /// Run an API call under the session policy: an auth failure that
    /// survived the refresh attempt, or a failed refresh, ends the session
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns whatever `call` returned, unchanged.
    pub async fn call<R, F>(&self, call: F) -> Result<R, ApiError>
    where
        F: Future<Output = Result<R, ApiError>>,
    {
        let result = call.await;
        if let Err(e) = &result {
            if e.is_session_lost() {
                tracing::warn!(error = %e, "authorization lost; logging out");
                self.session.logout();
            }
        }
        result
    }

    /// Log in, then load the profile into the session.
    ///
    /// Returns `None` when the server accepted the credentials but served no
    /// profile; the session is left unchanged in that case.
    ///
    /// # Errors
    ///
    /// Returns the login or profile failure; the server message is available
    /// through `ApiError::server_message`.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<User>, ApiError> {
        self.api.login_user(credentials).await?;
        self.load_profile().await
    }

    /// Register, then load the new profile into the session.
    ///
    /// # Errors
    ///
    /// Returns the signup or profile failure.
    pub async fn signup(&self, form: &SignupForm) -> Result<Option<User>, ApiError> {
        self.api.create_user(form).await?;
        self.load_profile().await
    }

    /// End the server session, then the local one.
    ///
    /// # Errors
    ///
    /// Returns the server failure; the local session is kept in that case.
    pub async fn logout(&self) -> Result<(), ApiError> {
        match self.api.logout_user().await {
            Ok(()) => {
                self.session.logout();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "logout failed");
                Err(e)
            }
        }
    }

    async fn load_profile(&self) -> Result<Option<User>, ApiError> {
        let user = self.api.current_user().await?;
        if let Some(user) = &user {
            self.session.login(user.clone());
        }
        Ok(user)
    }
}
