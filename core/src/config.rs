//! Client configuration.
//!
//! Values come from `CODICUE_*` environment variables when present and fall
//! back to a local development server otherwise.

use std::time::Duration;

use crate::auth::{AuthScheme, Session};
use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const ENV_BASE_URL: &str = "CODICUE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CODICUE_TIMEOUT_SECS";
pub const ENV_AUTH_SCHEME: &str = "CODICUE_AUTH_SCHEME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` leaves the transport's own defaults in place.
    pub timeout: Option<Duration>,
    pub auth_scheme: AuthScheme,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            auth_scheme: AuthScheme::Bearer,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ApiError::Config(format!("{ENV_BASE_URL} must be an http(s) URL, got `{url}`")));
            }
            config.base_url = url;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got `{secs}`")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(scheme) = get(ENV_AUTH_SCHEME) {
            config.auth_scheme = scheme.parse()?;
        }

        tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, scheme = ?config.auth_scheme, "client configuration loaded");
        Ok(config)
    }

    /// A session using the configured auth scheme.
    pub fn session(&self, token: Option<String>) -> Session {
        Session {
            token,
            scheme: self.auth_scheme,
        }
    }
}
