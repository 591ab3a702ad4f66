//! Error types for the CodiCue API client.
//!
//! # Design
//! Decoding never produces an error: malformed fields fall back to defaults
//! and are reported through `DecodeReport` instead. What remains is the
//! request side (serializing a body, reaching the server), a non-success
//! status surfaced by `Outcome::into_result`, and configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was received (DNS, TLS, connection, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status of 400 or above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),
}
