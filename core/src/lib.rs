//! API client core for the CodiCue styling app.
//!
//! # Overview
//! Builds `HttpRequest` values and parses classified responses for the
//! auth, stylist-directory and closet endpoints. The pure build/parse half
//! (`CodiCueClient`) never touches the network; `CodiCueApi` pairs it with a
//! `Transport` for callers that want one call per operation.
//!
//! # Design
//! - Success is `status < 400`. `Outcome` keeps the detail, `into_legacy`
//!   collapses it to `(ok, body)`.
//! - List responses are decoded leniently: missing or mistyped fields become
//!   zero values and are recorded in a `DecodeReport` rather than failing.
//! - Credentials come from an injected `Session`, never from ambient storage.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod outcome;
pub mod transport;
pub mod types;

pub use api::CodiCueApi;
pub use auth::{AuthScheme, Session};
pub use client::{CodiCueClient, Fetched};
pub use config::ClientConfig;
pub use decode::{DecodeReport, Fallback, FallbackReason};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::Outcome;
pub use transport::{Transport, UreqTransport};
pub use types::{AccessToken, BodyType, Credentials, Garment, GarmentCategory, Registration, StylistInfo};
