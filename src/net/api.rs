//! Typed wrappers for every REST endpoint the client uses.
//!
//! ERROR HANDLING
//! ==============
//! Each method goes through the `RefreshingClient`, so a 401 gets one silent
//! refresh. Payload-less responses (`data: null`) map to `None` or an empty
//! list; a body that is not an envelope is `ApiError::Decode`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::Method;
use serde::de::DeserializeOwned;

use super::interceptor::RefreshingClient;
use super::transport::{ApiRequest, HttpTransport, RawResponse};
use super::types::{Credentials, Envelope, FilePreview, Post, PostForm, SignupForm, User};
use crate::error::ApiError;

pub const CREATE_USER_PATH: &str = "/api/v1/user/create";
pub const LOGIN_PATH: &str = "/api/v1/user/login";
pub const LOGOUT_PATH: &str = "/api/v1/user/logout";
pub const CURRENT_USER_PATH: &str = "/api/v1/user/current-user";
pub const CREATE_POST_PATH: &str = "/api/v1/blog/create-post";
pub const ALL_ACTIVE_POSTS_PATH: &str = "/api/v1/blog/posts/all-active";
pub const INACTIVE_POSTS_PATH: &str = "/api/v1/blog/posts/inactive";
pub const ACTIVE_POSTS_PATH: &str = "/api/v1/blog/posts/active";

pub(crate) fn post_path(post_id: &str) -> String {
    format!("/api/v1/blog/{post_id}")
}

pub(crate) fn fetch_post_path(post_id: &str) -> String {
    format!("/api/v1/blog/fetch/{post_id}")
}

pub(crate) fn preview_path(file_id: &str) -> String {
    format!("/api/v1/blog/preview/{file_id}")
}

/// Blog API client. Built once and shared; the wrapped HTTP client carries
/// the cookie jar.
pub struct BlogApi<T> {
    client: RefreshingClient<T>,
}

impl<T: HttpTransport> BlogApi<T> {
    pub fn new(transport: T) -> Self {
        Self { client: RefreshingClient::new(transport) }
    }

    pub fn client(&self) -> &RefreshingClient<T> {
        &self.client
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// `POST /api/v1/user/create`
    ///
    /// # Errors
    ///
    /// Returns the classified failure; a 409 usually means the username or
    /// email is taken.
    pub async fn create_user(&self, form: &SignupForm) -> Result<Option<User>, ApiError> {
        let request = ApiRequest::post(CREATE_USER_PATH).json(to_json(form)?);
        self.fetch(request).await
    }

    /// `POST /api/v1/user/login`. Success establishes the session cookies.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, e.g. bad credentials.
    pub async fn login_user(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let request = ApiRequest::post(LOGIN_PATH).json(to_json(credentials)?);
        self.client.execute(request).await.map(drop)
    }

    /// `POST /api/v1/user/logout`
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn logout_user(&self) -> Result<(), ApiError> {
        self.client.execute(ApiRequest::post(LOGOUT_PATH)).await.map(drop)
    }

    /// `GET /api/v1/user/current-user`. `None` when the server answers with
    /// an empty payload.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        self.fetch(ApiRequest::get(CURRENT_USER_PATH)).await
    }

    /// `POST /api/v1/user/update-acess-token`. Returns the new access token.
    ///
    /// # Errors
    ///
    /// Returns the classified failure or `Decode` if no token came back.
    pub async fn update_access_token(&self) -> Result<String, ApiError> {
        self.client.refresh().await
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    /// `POST /api/v1/blog/create-post` (multipart).
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn create_post(&self, form: PostForm) -> Result<Option<Post>, ApiError> {
        let request = ApiRequest::post(CREATE_POST_PATH).multipart(form.into_parts());
        self.fetch(request).await
    }

    /// `PATCH /api/v1/blog/:id` (multipart). Owner only.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn update_post(&self, post_id: &str, form: PostForm) -> Result<Option<Post>, ApiError> {
        let request = ApiRequest::new(Method::PATCH, post_path(post_id)).multipart(form.into_parts());
        self.fetch(request).await
    }

    /// `GET /api/v1/blog/fetch/:id`
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn get_post(&self, post_id: &str) -> Result<Option<Post>, ApiError> {
        self.fetch(ApiRequest::get(fetch_post_path(post_id))).await
    }

    /// `DELETE /api/v1/blog/:id`. Owner only.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::DELETE, post_path(post_id));
        self.client.execute(request).await.map(drop)
    }

    /// `GET /api/v1/blog/posts/all-active`
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_list(ALL_ACTIVE_POSTS_PATH).await
    }

    /// `GET /api/v1/blog/posts/inactive`
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn inactive_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_list(INACTIVE_POSTS_PATH).await
    }

    /// `GET /api/v1/blog/posts/active`
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn active_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.fetch_list(ACTIVE_POSTS_PATH).await
    }

    /// `GET /api/v1/blog/preview/:fileId`
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or `Decode` when no URL came back.
    pub async fn file_preview(&self, file_id: &str) -> Result<FilePreview, ApiError> {
        self.fetch(ApiRequest::get(preview_path(file_id)))
            .await?
            .ok_or_else(|| ApiError::Decode(format!("no preview for file {file_id}")))
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    async fn fetch<P: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<P>, ApiError> {
        let response = self.client.execute(request).await?;
        decode_payload(&response)
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Post>, ApiError> {
        Ok(self.fetch(ApiRequest::get(path)).await?.unwrap_or_default())
    }
}

pub(crate) fn decode_payload<P: DeserializeOwned>(response: &RawResponse) -> Result<Option<P>, ApiError> {
    let envelope: Envelope<P> = serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

fn to_json<S: serde::Serialize>(value: &S) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
