//! Authorization headers derived from an injected session.
//!
//! Two header shapes exist in the app. `Bearer` is what the closet endpoint
//! is called with. `LegacyBasic` reproduces the other builder byte for byte:
//! it puts the raw token after `Basic ` without base64-encoding
//! `token:` as RFC 7617 would. Which one the server actually expects is
//! unresolved, so both are kept and selectable.

use crate::error::ApiError;
use crate::http::Headers;

pub const AUTHORIZATION: &str = "Authorization";

/// Parsed from `bearer` or `legacy-basic` (alias `basic`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    #[default]
    Bearer,
    LegacyBasic,
}

impl std::str::FromStr for AuthScheme {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "legacy-basic" | "basic" => Ok(AuthScheme::LegacyBasic),
            other => Err(ApiError::Config(format!("unknown auth scheme `{other}`"))),
        }
    }
}

/// The signed-in state the host hands to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub scheme: AuthScheme,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            scheme: AuthScheme::Bearer,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Token text, or the empty string when signed out.
    pub fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    /// Always exactly one `Authorization` header, even without a token.
    pub fn auth_headers(&self) -> Headers {
        let token = self.token_or_empty();
        let value = match self.scheme {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::LegacyBasic => format!("Basic {token}"),
        };
        vec![(AUTHORIZATION.to_string(), value)]
    }
}
