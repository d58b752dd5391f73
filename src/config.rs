//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const LOCAL_BASE_URL: &str = "http://localhost:3000";
pub const DEPLOYED_BASE_URL: &str = "https://blogsitebackend-bckt.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown BLOG_DEPLOYMENT: {0} (expected 'local' or 'deployed')")]
    UnknownDeployment(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Which backend the default base URL points at when none is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Deployed,
}

impl Deployment {
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Local => LOCAL_BASE_URL,
            Self::Deployed => DEPLOYED_BASE_URL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme + host (+ port) of the REST API, without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config for an explicit base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an `http://` or `https://` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, timeouts: Timeouts::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BLOG_BASE_URL`: explicit API base URL
    /// - `BLOG_DEPLOYMENT`: `local` (default) or `deployed`, picks the base URL
    ///   when `BLOG_BASE_URL` is unset
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BLOG_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown deployment or a malformed base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let deployment = parse_deployment(std::env::var("BLOG_DEPLOYMENT").ok().as_deref())?;
        let raw_base = std::env::var("BLOG_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| deployment.default_base_url().to_owned());
        let base_url = normalize_base_url(&raw_base)?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("BLOG_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BLOG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { base_url, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_deployment(raw: Option<&str>) -> Result<Deployment, ConfigError> {
    match raw.map(str::trim).unwrap_or("local") {
        "" | "local" => Ok(Deployment::Local),
        "deployed" => Ok(Deployment::Deployed),
        other => Err(ConfigError::UnknownDeployment(other.to_owned())),
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidBaseUrl(raw.to_owned()))?;
    if host.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
