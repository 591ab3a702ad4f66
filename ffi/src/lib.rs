//! C-ABI wrapper around `codicue-core` for the mobile host.
//!
//! # Overview
//! The host app keeps doing the actual HTTP round-trip. It asks this library
//! for a ready-made request (`codicue_build_*`), executes it, and hands the
//! status and body back to `codicue_parse_*`, which returns the `(ok, body)`
//! shape the existing screens expect.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The signed-in token is passed in per call; the library keeps no
//!   session state.
//! - The C caller owns all returned pointers and must call the matching
//!   `codicue_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use codicue_core::{ApiError, AuthScheme, Credentials, Outcome, Registration, Session};

use types::*;

/// `scheme` value selecting `Authorization: Bearer <token>`.
pub const CODICUE_AUTH_BEARER: u32 = 0;
/// `scheme` value selecting `Authorization: Basic <token>` (raw token).
pub const CODICUE_AUTH_LEGACY_BASIC: u32 = 1;

/// Read a C string; null yields `None`, invalid UTF-8 yields `""`.
unsafe fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("").to_string())
}

fn session(token: *const c_char, scheme: u32) -> Session {
    let scheme = match scheme {
        CODICUE_AUTH_LEGACY_BASIC => AuthScheme::LegacyBasic,
        _ => AuthScheme::Bearer,
    };
    Session {
        token: unsafe { read_str(token) },
        scheme,
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// Returns null if `base_url` is null. Free with `codicue_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_client_new(base_url: *const c_char) -> *mut FfiClient {
    catch_unwind(|| match unsafe { read_str(base_url) } {
        Some(url) => Box::into_raw(Box::new(FfiClient {
            inner: codicue_core::CodiCueClient::new(&url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `codicue_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

fn build_auth(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
    stylist: bool,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(email), Some(password)) = (unsafe { read_str(email) }, unsafe { read_str(password) }) else {
            return std::ptr::null_mut();
        };
        let credentials = Credentials { email, password };
        let req = if stylist {
            client.inner.build_stylist_login(&credentials)
        } else {
            client.inner.build_login(&credentials)
        };
        match req {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `POST auth/login`.
///
/// Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_login(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_auth(client, email, password, false)
}

/// Build `POST auth/stylist/login`.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_stylist_login(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_auth(client, email, password, true)
}

/// Build `POST user`.
///
/// `styles` points to `styles_len` C strings and may be null when
/// `styles_len` is 0. `height` and `weight` may be null (sent as `""`).
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_register(
    client: *const FfiClient,
    email: *const c_char,
    password: *const c_char,
    name: *const c_char,
    height: *const c_char,
    weight: *const c_char,
    styles: *const *const c_char,
    styles_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || (styles.is_null() && styles_len > 0) {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let (Some(email), Some(password), Some(name)) =
            (unsafe { read_str(email) }, unsafe { read_str(password) }, unsafe { read_str(name) })
        else {
            return std::ptr::null_mut();
        };
        let preferred_style = if styles_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(styles, styles_len as usize) }
                .iter()
                .filter_map(|&s| unsafe { read_str(s) })
                .collect()
        };
        let registration = Registration {
            email,
            password,
            name,
            height: unsafe { read_str(height) }.unwrap_or_default(),
            weight: unsafe { read_str(weight) }.unwrap_or_default(),
            preferred_style,
        };
        match client.inner.build_register(&registration) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `GET stylists` (no auth).
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_list_stylists(client: *const FfiClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_stylists())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `GET user/items`.
///
/// `token` may be null (signed out); the header is still attached.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_list_garments(
    client: *const FfiClient,
    token: *const c_char,
    scheme: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_garments(&session(token, scheme)))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `DELETE user/items/{id}`.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_build_delete_garment(
    client: *const FfiClient,
    token: *const c_char,
    scheme: u32,
    id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_garment(&session(token, scheme), id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn classify(resp: &FfiHttpResponse) -> Outcome {
    if resp.status == 0 {
        return Outcome::classify(Err(ApiError::Transport("no response".to_string())));
    }
    let body = unsafe { read_str(resp.body) }.unwrap_or_default();
    Outcome::classify(Ok(codicue_core::HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }))
}

/// Classify any response into `(ok, body)`.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_parse_response(response: *const FfiHttpResponse) -> *mut FfiLegacyResult {
    catch_unwind(|| {
        if response.is_null() {
            return FfiLegacyResult::null_arg("response");
        }
        FfiLegacyResult::from_outcome(classify(unsafe { &*response }))
    })
    .unwrap_or_else(|_| FfiLegacyResult::panic("panic in codicue_parse_response"))
}

/// `accessToken` from an auth response, or null. Free with
/// `codicue_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_parse_access_token(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() || response.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let outcome = classify(unsafe { &*response });
        match client.inner.parse_access_token(&outcome) {
            Some(token) => to_c(token),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Decode a `GET stylists` response. On success `body` is a JSON array of
/// normalized stylist records.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_parse_list_stylists(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLegacyResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiLegacyResult::null_arg("client");
        }
        if response.is_null() {
            return FfiLegacyResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = classify(unsafe { &*response });
        let fetched = client.inner.parse_list_stylists(&outcome);
        FfiLegacyResult::from_fetched(&outcome, fetched)
    })
    .unwrap_or_else(|_| FfiLegacyResult::panic("panic in codicue_parse_list_stylists"))
}

/// Decode a `GET user/items` response. On success `body` is a JSON array of
/// normalized garment records.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_parse_list_garments(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLegacyResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiLegacyResult::null_arg("client");
        }
        if response.is_null() {
            return FfiLegacyResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = classify(unsafe { &*response });
        let fetched = client.inner.parse_list_garments(&outcome);
        FfiLegacyResult::from_fetched(&outcome, fetched)
    })
    .unwrap_or_else(|_| FfiLegacyResult::panic("panic in codicue_parse_list_garments"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `codicue_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c(req.url);
        free_c(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c(h.key);
                free_c(h.value);
            }
        }
    });
}

/// Free a result returned by any `codicue_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_free_result(result: *mut FfiLegacyResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c(result.body);
        free_c(result.error_message);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn codicue_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c(s));
}

fn free_c(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
