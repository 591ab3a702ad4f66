//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests go out as plain C structs the host can feed to its own HTTP
//! stack. Everything coming back is folded into one `FfiLegacyResult`:
//! the `(ok, body)` pair the app already understands, plus the outcome kind
//! and status for hosts that want to tell failures apart. Bodies cross the
//! boundary as JSON text so the host keeps decoding with its own JSON layer.

use std::ffi::CString;
use std::os::raw::c_char;

use codicue_core::{Fetched, HttpMethod, Outcome};
use serde_json::Value;

/// Opaque handle to a `CodiCueClient`.
pub struct FfiClient {
    pub(crate) inner: codicue_core::CodiCueClient,
}

/// Owned C string with interior NULs removed.
pub(crate) fn to_c(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request for the host to execute. Free with `codicue_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// JSON text, or null for bodiless requests.
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: codicue_core::HttpRequest) -> *mut Self {
        let url = to_c(req.url);
        let body = match req.body {
            Some(b) => to_c(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c(k),
                    value: to_c(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// What the host got back. `status == 0` means no response arrived.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiOutcomeKind {
    Success = 0,
    Empty = 1,
    HttpError = 2,
    Transport = 3,
    NullArg = 4,
    Panic = 5,
}

/// `(ok, body)` plus detail. Free with `codicue_free_result`.
#[repr(C)]
pub struct FfiLegacyResult {
    pub ok: bool,
    pub kind: FfiOutcomeKind,
    /// 0 when no response arrived.
    pub http_status: u16,
    /// JSON text, or null when there is no body.
    pub body: *mut c_char,
    /// Fields that fell back to defaults while decoding a list.
    pub fallback_count: u32,
    /// Human-readable detail for failures, or null.
    pub error_message: *mut c_char,
}

impl FfiLegacyResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    pub(crate) fn from_outcome(outcome: Outcome) -> *mut Self {
        let kind = match &outcome {
            Outcome::Success { .. } => FfiOutcomeKind::Success,
            Outcome::Empty { .. } => FfiOutcomeKind::Empty,
            Outcome::HttpError { .. } => FfiOutcomeKind::HttpError,
            Outcome::TransportError(_) => FfiOutcomeKind::Transport,
        };
        let error_message = match &outcome {
            Outcome::HttpError { status, .. } => to_c(format!("HTTP {status}")),
            Outcome::TransportError(cause) => to_c(cause.as_str()),
            _ => std::ptr::null_mut(),
        };
        let http_status = outcome.status();
        let (ok, body) = outcome.into_legacy();
        FfiLegacyResult {
            ok,
            kind,
            http_status,
            body: json_or_null(&body),
            fallback_count: 0,
            error_message,
        }
        .boxed()
    }

    /// A decoded list: `body` is the normalized records as a JSON array.
    pub(crate) fn from_fetched<T: serde::Serialize>(outcome: &Outcome, fetched: Fetched<T>) -> *mut Self {
        if !fetched.ok {
            return Self::from_outcome(outcome.clone());
        }
        let body = serde_json::to_string(&fetched.items).unwrap_or_else(|_| "[]".to_string());
        FfiLegacyResult {
            ok: true,
            kind: FfiOutcomeKind::Success,
            http_status: fetched.status,
            body: to_c(body),
            fallback_count: fetched.report.fallbacks.len() as u32,
            error_message: std::ptr::null_mut(),
        }
        .boxed()
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiOutcomeKind::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiOutcomeKind::Panic, msg)
    }

    fn failure(kind: FfiOutcomeKind, msg: &str) -> *mut Self {
        FfiLegacyResult {
            ok: false,
            kind,
            http_status: 0,
            body: std::ptr::null_mut(),
            fallback_count: 0,
            error_message: to_c(msg),
        }
        .boxed()
    }
}

fn json_or_null(value: &Value) -> *mut c_char {
    if value.is_null() {
        std::ptr::null_mut()
    } else {
        to_c(value.to_string())
    }
}
