//! Error taxonomy for calls against the blog API.
//!
//! DESIGN
//! ======
//! `TransportError` covers failures where no HTTP response was received.
//! `ApiError` is what callers see: the transport failure, or a response
//! classified by status code. Only `ApiError::Auth` is ever intercepted
//! (see `net::interceptor`); everything else reaches the caller verbatim.
//! A failed refresh comes back as `ApiError::RefreshFailed` wrapping the
//! refresh error, so callers can end the session whatever the cause was.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::transport::RawResponse;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Failures below the HTTP layer: nothing usable came back from the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// A response started arriving but its body could not be read.
    #[error("response body read failed: {0}")]
    Body(String),

    /// The request body could not be encoded; nothing was sent.
    #[error("request body encode failed: {0}")]
    Encode(String),
}

// =============================================================================
// API
// =============================================================================

/// Classified failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered 401 and the one refresh attempt did not recover it.
    #[error("unauthorized: {}", message_or(.message, "authentication required"))]
    Auth { message: Option<String> },

    /// Any other 4xx, typically a server-side validation or ownership check.
    #[error("request rejected ({status}): {}", message_or(.message, "no message"))]
    Validation { status: u16, message: Option<String> },

    /// 5xx, or a status the client has no better bucket for.
    #[error("server failure ({status}): {}", message_or(.message, "no message"))]
    Server { status: u16, message: Option<String> },

    /// The body was not the expected `{ data, success, message }` envelope,
    /// or a request payload could not be encoded.
    #[error("unexpected payload: {0}")]
    Decode(String),

    /// The client could not be configured.
    #[error("client configuration invalid: {0}")]
    Config(String),

    /// A 401 triggered a token refresh and the refresh itself failed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(Box<ApiError>),
}

fn message_or<'a>(message: &'a Option<String>, fallback: &'a str) -> &'a str {
    message.as_deref().unwrap_or(fallback)
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::ClientBuild(msg) => Self::Config(msg),
            TransportError::Encode(msg) => Self::Decode(msg),
            TransportError::Request(_) | TransportError::Body(_) => Self::Network(err.to_string()),
        }
    }
}

impl ApiError {
    /// Classify a non-success response. The envelope `message`, when the body
    /// carries one, is kept for user-facing display.
    #[must_use]
    pub fn from_response(response: &RawResponse) -> Self {
        let message = envelope_message(&response.body);
        match response.status {
            401 => Self::Auth { message },
            status @ 400..=499 => Self::Validation { status, message },
            status => Self::Server { status, message },
        }
    }

    /// HTTP status associated with this error, if a response was received.
    /// For a failed refresh this is the refresh response's status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RefreshFailed(inner) => inner.status(),
            Self::Auth { .. } => Some(401),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) | Self::Config(_) => None,
        }
    }

    /// Server-provided message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::RefreshFailed(inner) => inner.server_message(),
            Self::Auth { message } | Self::Validation { message, .. } | Self::Server { message, .. } => {
                message.as_deref()
            }
            Self::Network(_) | Self::Decode(_) | Self::Config(_) => None,
        }
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the server no longer recognizes this client: a 401 that
    /// survived the refresh, or any refresh failure.
    #[must_use]
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::RefreshFailed(_))
    }

    /// The refresh error, when this is a failed refresh.
    #[must_use]
    pub fn refresh_failure(&self) -> Option<&ApiError> {
        match self {
            Self::RefreshFailed(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Auth { .. } => "E_AUTH",
            Self::Validation { .. } => "E_VALIDATION",
            Self::Server { .. } => "E_SERVER",
            Self::Decode(_) => "E_DECODE",
            Self::Config(_) => "E_CONFIG",
            Self::RefreshFailed(_) => "E_REFRESH",
        }
    }

    /// Whether repeating the same call later could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::RefreshFailed(inner) => inner.retryable(),
            _ => matches!(self, Self::Network(_) | Self::Server { status: 500..=599, .. }),
        }
    }
}

fn envelope_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
