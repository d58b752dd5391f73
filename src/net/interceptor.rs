//! Token-refresh interceptor wrapped around every outbound API call.
//!
//! DESIGN
//! ======
//! Per request: send; on 401 with `retried == false`, call the refresh
//! endpoint once, put the new access token in `Authorization`, set `retried`
//! and send again. The replay's outcome is final. A failed refresh ends the
//! request with `ApiError::RefreshFailed` carrying the refresh error, not the
//! original 401.
//!
//! The refresh call goes straight to the transport, so a 401 from the refresh
//! endpoint cannot trigger another refresh.
//!
//! Concurrent requests that 401 together each refresh on their own; nothing
//! coalesces them.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use super::transport::{ApiRequest, HttpTransport, RawResponse};
use super::types::{AccessToken, Envelope};
use crate::error::ApiError;

pub const REFRESH_PATH: &str = "/api/v1/user/update-acess-token";

/// HTTP client configured once at startup and shared by every API call.
pub struct RefreshingClient<T> {
    transport: T,
}

impl<T: HttpTransport> RefreshingClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request`, recovering at most once from a 401 via token refresh.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the final attempt, or
    /// `ApiError::RefreshFailed` wrapping the refresh error when the refresh
    /// itself failed.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<RawResponse, ApiError> {
        loop {
            let response = self.transport.send(&request).await?;
            if response.is_success() {
                return Ok(response);
            }

            if response.status != 401 || request.retried {
                let err = ApiError::from_response(&response);
                tracing::debug!(path = %request.path, status = response.status, retried = request.retried, "api call failed");
                return Err(err);
            }

            tracing::info!(path = %request.path, "access token rejected; refreshing");
            request.retried = true;
            let token = self.refresh().await.map_err(|e| {
                tracing::warn!(path = %request.path, error = %e, "token refresh failed");
                ApiError::RefreshFailed(Box::new(e))
            })?;
            request.set_bearer(&token)?;
        }
    }

    /// Mint a new access token from the refresh cookie.
    ///
    /// # Errors
    ///
    /// Returns the classified refresh failure, or `ApiError::Decode` when the
    /// response has no `data.accessToken`.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let response = self.transport.send(&ApiRequest::post(REFRESH_PATH)).await?;
        if !response.is_success() {
            return Err(ApiError::from_response(&response));
        }
        let envelope: Envelope<AccessToken> =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope
            .data
            .map(|t| t.access_token)
            .ok_or_else(|| ApiError::Decode("refresh response carried no access token".into()))
    }
}
