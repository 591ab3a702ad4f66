//! Classification of a finished (or failed) round-trip.
//!
//! # Design
//! Success is decided by status alone: anything below 400 succeeded. The
//! tagged `Outcome` keeps the detail (which status, which transport failure)
//! for logging and tests, and `into_legacy` collapses it to the
//! `(ok, body)` pair the app's screens were written against. A failed
//! response still has its body parsed, so error payloads remain readable.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Status below 400 with a JSON body.
    Success { status: u16, body: Value },
    /// Status below 400 whose body was blank or not JSON.
    Empty { status: u16 },
    /// Status 400 or above. `body` is `Null` when the payload is not JSON.
    HttpError { status: u16, body: Value },
    /// No response at all.
    TransportError(String),
}

impl Outcome {
    pub fn classify(result: Result<HttpResponse, ApiError>) -> Outcome {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("request failed without a response: {err}");
                return Outcome::TransportError(err.to_string());
            }
        };

        let body = parse_body(&response.body);
        if response.status < 400 {
            match body {
                Some(body) => Outcome::Success {
                    status: response.status,
                    body,
                },
                None => Outcome::Empty {
                    status: response.status,
                },
            }
        } else {
            tracing::warn!(status = response.status, "request rejected by server");
            Outcome::HttpError {
                status: response.status,
                body: body.unwrap_or(Value::Null),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. } | Outcome::Empty { .. })
    }

    /// Status code as the legacy layer saw it; 0 when nothing came back.
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Success { status, .. }
            | Outcome::Empty { status }
            | Outcome::HttpError { status, .. } => *status,
            Outcome::TransportError(_) => 0,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            Outcome::Success { body, .. } | Outcome::HttpError { body, .. } => body,
            Outcome::Empty { .. } | Outcome::TransportError(_) => &NULL,
        }
    }

    /// Collapse to `(succeeded, body)`; `Value::Null` means no body.
    pub fn into_legacy(self) -> (bool, Value) {
        let ok = self.is_success();
        let body = match self {
            Outcome::Success { body, .. } | Outcome::HttpError { body, .. } => body,
            Outcome::Empty { .. } | Outcome::TransportError(_) => Value::Null,
        };
        (ok, body)
    }

    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            Outcome::Success { body, .. } => Ok(body),
            Outcome::Empty { .. } => Ok(Value::Null),
            Outcome::HttpError { status, body } => Err(ApiError::HttpError {
                status,
                body: if body.is_null() {
                    String::new()
                } else {
                    body.to_string()
                },
            }),
            Outcome::TransportError(cause) => Err(ApiError::Transport(cause)),
        }
    }
}

fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("response body is not JSON: {e}");
            None
        }
    }
}
