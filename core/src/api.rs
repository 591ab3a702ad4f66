//! Blocking API facade: build, execute, classify, decode.
//!
//! `CodiCueApi` owns a `CodiCueClient` and a `Transport` and exposes one
//! method per app operation. Every method takes `&self` and keeps no state
//! between calls, so one instance can serve concurrent callers. The
//! `send_*_request` methods return the `(ok, body)` pair the app's screens
//! were written against.

use serde::Serialize;
use serde_json::Value;

use crate::auth::{Session, AUTHORIZATION};
use crate::client::{CodiCueClient, Fetched};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::outcome::Outcome;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Credentials, Garment, Registration, StylistInfo};

#[derive(Debug, Clone)]
pub struct CodiCueApi<T = UreqTransport> {
    client: CodiCueClient,
    transport: T,
}

impl CodiCueApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(CodiCueClient::new(&config.base_url), UreqTransport::new(config))
    }
}

impl<T: Transport> CodiCueApi<T> {
    pub fn with_transport(client: CodiCueClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CodiCueClient {
        &self.client
    }

    /// Run one request and classify what came back.
    pub fn execute(&self, request: &HttpRequest) -> Outcome {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            headers = ?redacted(&request.headers),
            body = %redacted_body(request.body.as_deref().unwrap_or("")),
            "sending request"
        );
        let result = self.transport.execute(request);
        if let Ok(HttpResponse { status, body, .. }) = &result {
            tracing::debug!(status, body = %redacted_body(body), "received response");
        }
        Outcome::classify(result)
    }

    pub fn get(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> Outcome {
        self.execute(&self.client.build_get(endpoint, headers))
    }

    pub fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
        headers: Option<&[(String, String)]>,
    ) -> Result<Outcome, ApiError> {
        let request = self.client.build_post(endpoint, payload, headers)?;
        Ok(self.execute(&request))
    }

    pub fn delete(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> Outcome {
        self.execute(&self.client.build_delete(endpoint, headers))
    }

    pub fn send_get_request(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> (bool, Value) {
        self.get(endpoint, headers).into_legacy()
    }

    pub fn send_post_request<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
        headers: Option<&[(String, String)]>,
    ) -> (bool, Value) {
        match self.post(endpoint, payload, headers) {
            Ok(outcome) => outcome.into_legacy(),
            Err(e) => {
                tracing::warn!(endpoint, "request not sent: {e}");
                (false, Value::Null)
            }
        }
    }

    pub fn send_delete_request(&self, endpoint: &str, headers: Option<&[(String, String)]>) -> (bool, Value) {
        self.delete(endpoint, headers).into_legacy()
    }

    pub fn login(&self, credentials: &Credentials) -> Option<String> {
        self.token_from(self.client.build_login(credentials))
    }

    pub fn stylist_login(&self, credentials: &Credentials) -> Option<String> {
        self.token_from(self.client.build_stylist_login(credentials))
    }

    pub fn register(&self, registration: &Registration) -> Option<String> {
        self.token_from(self.client.build_register(registration))
    }

    fn token_from(&self, request: Result<HttpRequest, ApiError>) -> Option<String> {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("request not sent: {e}");
                return None;
            }
        };
        let outcome = self.execute(&request);
        self.client.parse_access_token(&outcome)
    }

    pub fn fetch_stylists(&self) -> Fetched<StylistInfo> {
        let outcome = self.execute(&self.client.build_list_stylists());
        self.client.parse_list_stylists(&outcome)
    }

    pub fn fetch_clothes(&self, session: &Session) -> Fetched<Garment> {
        let outcome = self.execute(&self.client.build_list_garments(session));
        self.client.parse_list_garments(&outcome)
    }

    pub fn delete_garment(&self, session: &Session, id: i64) -> bool {
        self.execute(&self.client.build_delete_garment(session, id))
            .is_success()
    }
}

fn redacted(headers: &[(String, String)]) -> Vec<(&str, &str)> {
    headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case(AUTHORIZATION) {
                (k.as_str(), "<redacted>")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect()
}

/// JSON keys whose values never reach the log.
const SECRET_KEYS: [&str; 2] = ["password", "accessToken"];

/// A body as it may be logged: secret values inside JSON are masked at any
/// depth. Non-JSON bodies pass through unchanged.
fn redacted_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(mut value) => {
            mask_secrets(&mut value);
            value.to_string()
        }
        Err(_) => body.to_string(),
    }
}

fn mask_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *inner = Value::String("<redacted>".to_string());
                } else {
                    mask_secrets(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}
