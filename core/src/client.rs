//! Stateless HTTP request builder and response parser for the CodiCue API.
//!
//! # Design
//! `CodiCueClient` holds only a `base_url`. Every operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the classified `Outcome`. Executing the round-trip is
//! somebody else's job (`CodiCueApi` with a `Transport`, or the host app
//! through FFI), which keeps this side deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::decode::{decode_list, DecodeReport, LenientDecode};
use crate::error::ApiError;
use crate::http::{merge_headers, Headers, HttpMethod, HttpRequest};
use crate::outcome::Outcome;
use crate::types::{AccessToken, Credentials, Garment, Registration, StylistInfo};

pub const LOGIN: &str = "auth/login";
pub const STYLIST_LOGIN: &str = "auth/stylist/login";
pub const REGISTER: &str = "user";
pub const STYLISTS: &str = "stylists";
pub const USER_ITEMS: &str = "user/items";

/// A decoded list response.
///
/// `items` is empty both when the server returned `[]` and when the request
/// failed; `ok` tells the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub ok: bool,
    pub status: u16,
    pub items: Vec<T>,
    pub report: DecodeReport,
}

impl<T> Fetched<T> {
    fn failed(status: u16) -> Self {
        Self {
            ok: false,
            status,
            items: Vec::new(),
            report: DecodeReport::default(),
        }
    }
}

/// Synchronous, stateless client for the CodiCue API.
#[derive(Debug, Clone)]
pub struct CodiCueClient {
    base_url: String,
}

impl CodiCueClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // -----------------------------------------------------------------------
    // Generic builders
    // -----------------------------------------------------------------------

    pub fn build_get(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(endpoint),
            headers: merge_headers(&[], headers.unwrap_or_default()),
            body: None,
        }
    }

    pub fn build_post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
        headers: Option<&[(String, String)]>,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let defaults: Headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(endpoint),
            headers: merge_headers(&defaults, headers.unwrap_or_default()),
            body: Some(body),
        })
    }

    pub fn build_delete(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.url(endpoint),
            headers: merge_headers(&[], headers.unwrap_or_default()),
            body: None,
        }
    }

    // -----------------------------------------------------------------------
    // Endpoint builders
    // -----------------------------------------------------------------------

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build_post(LOGIN, credentials, None)
    }

    pub fn build_stylist_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build_post(STYLIST_LOGIN, credentials, None)
    }

    pub fn build_register(&self, registration: &Registration) -> Result<HttpRequest, ApiError> {
        self.build_post(REGISTER, registration, None)
    }

    /// The stylist directory is public; no auth header is attached.
    pub fn build_list_stylists(&self) -> HttpRequest {
        self.build_get(STYLISTS, None)
    }

    pub fn build_list_garments(&self, session: &Session) -> HttpRequest {
        self.build_get(USER_ITEMS, Some(&session.auth_headers()))
    }

    pub fn build_delete_garment(&self, session: &Session, id: i64) -> HttpRequest {
        self.build_delete(&format!("{USER_ITEMS}/{id}"), Some(&session.auth_headers()))
    }

    // -----------------------------------------------------------------------
    // Parsers
    // -----------------------------------------------------------------------

    /// `accessToken` from an auth response, if the call succeeded and the
    /// field is a string.
    pub fn parse_access_token(&self, outcome: &Outcome) -> Option<String> {
        if !outcome.is_success() {
            return None;
        }
        AccessToken::deserialize(outcome.body())
            .map(|t| t.access_token)
            .ok()
    }

    pub fn parse_list_stylists(&self, outcome: &Outcome) -> Fetched<StylistInfo> {
        self.parse_list_at(outcome, Utc::now())
    }

    pub fn parse_list_garments(&self, outcome: &Outcome) -> Fetched<Garment> {
        self.parse_list_at(outcome, Utc::now())
    }

    /// Decode a list response; unreadable timestamps become `now`.
    pub fn parse_list_at<T: LenientDecode>(&self, outcome: &Outcome, now: DateTime<Utc>) -> Fetched<T> {
        if !outcome.is_success() {
            return Fetched::failed(outcome.status());
        }
        let (items, report) = decode_list(outcome.body(), now);
        Fetched {
            ok: true,
            status: outcome.status(),
            items,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthScheme;
    use crate::http::HttpResponse;
    use chrono::TimeZone;
    use serde_json::json;

    fn client() -> CodiCueClient {
        CodiCueClient::new("http://localhost:3000")
    }

    fn outcome(status: u16, body: &str) -> Outcome {
        Outcome::classify(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }))
    }

    fn h(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn get_without_headers_has_no_headers() {
        let req = client().build_get("stylists", None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/stylists");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_defaults_to_json_content_type() {
        let req = client().build_post("auth/login", &json!({"a": 1}), None).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.headers, vec![h("Content-Type", "application/json")]);
    }

    #[test]
    fn caller_header_overrides_post_default() {
        let extra = [h("Content-Type", "application/vnd.codicue+json")];
        let req = client().build_post("user", &json!({}), Some(&extra)).unwrap();
        assert_eq!(req.headers, vec![h("Content-Type", "application/vnd.codicue+json")]);
    }

    #[test]
    fn delete_has_empty_defaults() {
        let req = client().build_delete("/user/items/3", None);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/user/items/3");
        assert!(req.headers.is_empty());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CodiCueClient::new("http://localhost:3000/");
        assert_eq!(client.build_list_stylists().url, "http://localhost:3000/stylists");
    }

    #[test]
    fn login_request_carries_credentials() {
        let creds = Credentials {
            email: "me@codicue.app".into(),
            password: "secret".into(),
        };
        let req = client().build_login(&creds).unwrap();
        assert_eq!(req.url, "http://localhost:3000/auth/login");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "me@codicue.app", "password": "secret"}));

        let req = client().build_stylist_login(&creds).unwrap();
        assert_eq!(req.url, "http://localhost:3000/auth/stylist/login");
    }

    #[test]
    fn stylist_listing_is_unauthenticated() {
        let req = client().build_list_stylists();
        assert!(req.header("Authorization").is_none());
    }

    #[test]
    fn garment_listing_uses_session_header() {
        let req = client().build_list_garments(&Session::new("tok"));
        assert_eq!(req.url, "http://localhost:3000/user/items");
        assert_eq!(req.headers, vec![h("Authorization", "Bearer tok")]);

        let legacy = Session::new("tok").with_scheme(AuthScheme::LegacyBasic);
        let req = client().build_delete_garment(&legacy, 12);
        assert_eq!(req.url, "http://localhost:3000/user/items/12");
        assert_eq!(req.header("authorization"), Some("Basic tok"));
    }

    #[test]
    fn access_token_only_on_success() {
        let c = client();
        assert_eq!(
            c.parse_access_token(&outcome(200, r#"{"accessToken":"jwt"}"#)).as_deref(),
            Some("jwt")
        );
        assert_eq!(c.parse_access_token(&outcome(401, r#"{"accessToken":"jwt"}"#)), None);
        assert_eq!(c.parse_access_token(&outcome(200, r#"{"token":"jwt"}"#)), None);
    }

    #[test]
    fn access_token_payload_tolerates_extra_fields_only() {
        let c = client();
        let body = r#"{"accessToken":"jwt","user":{"id":1,"name":"데모"}}"#;
        assert_eq!(c.parse_access_token(&outcome(201, body)).as_deref(), Some("jwt"));
        assert_eq!(c.parse_access_token(&outcome(200, r#"{"accessToken":42}"#)), None);
        assert_eq!(c.parse_access_token(&outcome(200, "[]")), None);
        assert_eq!(c.parse_access_token(&outcome(204, "")), None);
    }

    #[test]
    fn empty_list_and_failure_are_distinguishable() {
        let c = client();
        let empty = c.parse_list_stylists(&outcome(200, "[]"));
        assert!(empty.ok);
        assert!(empty.items.is_empty());

        let failed = c.parse_list_stylists(&outcome(500, r#"{"message":"boom"}"#));
        assert!(!failed.ok);
        assert_eq!(failed.status, 500);
        assert!(failed.items.is_empty());
    }

    #[test]
    fn non_array_success_degrades_to_empty() {
        let fetched = client().parse_list_garments(&outcome(200, r#"{"items":[]}"#));
        assert!(fetched.ok);
        assert!(fetched.items.is_empty());
        assert!(fetched.report.not_an_array);
    }

    #[test]
    fn parse_list_at_uses_supplied_clock() {
        let now = Utc.with_ymd_and_hms(2031, 3, 3, 3, 3, 3).unwrap();
        let fetched: Fetched<StylistInfo> =
            client().parse_list_at(&outcome(200, r#"[{"id":1,"name":"x"}]"#), now);
        assert_eq!(fetched.items[0].created_at, now);
        assert!(fetched.report.has(0, "createdAt"));
    }

    #[test]
    fn missing_timestamp_falls_back_to_wall_clock() {
        let c = client();
        let before = Utc::now();
        let stylists = c.parse_list_stylists(&outcome(200, r#"[{"id":1,"name":"x"}]"#));
        let garments = c.parse_list_garments(&outcome(200, r#"[{"id":2,"createdAt":"yesterday"}]"#));
        let after = Utc::now();

        for at in [
            stylists.items[0].created_at,
            stylists.items[0].updated_at,
            garments.items[0].created_at,
            garments.items[0].updated_at,
        ] {
            assert!(before <= at && at <= after, "{at} outside [{before}, {after}]");
        }
        assert!(stylists.report.has(0, "createdAt"));
        assert!(garments.report.has(0, "createdAt"));
    }
}
