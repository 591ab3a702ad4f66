//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `CodiCueClient` builds
//! `HttpRequest` values and the parse side consumes `HttpResponse` values;
//! executing the round-trip is left to a `Transport` (or to the mobile host
//! through the FFI crate).
//!
//! Headers are an ordered `Vec` of pairs rather than a map so the exact
//! header list a request carries is easy to assert on and to hand across FFI.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

pub type Headers = Vec<(String, String)>;

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

/// Merge `overrides` over `defaults`.
///
/// A header in `overrides` replaces the default with the same name (compared
/// ASCII case-insensitively) in place; new names are appended in order.
pub fn merge_headers(defaults: &[(String, String)], overrides: &[(String, String)]) -> Headers {
    let mut merged: Headers = defaults.to_vec();
    for (name, value) in overrides {
        match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn merge_with_no_overrides_keeps_defaults() {
        let merged = merge_headers(&[h("Content-Type", "application/json")], &[]);
        assert_eq!(merged, vec![h("Content-Type", "application/json")]);
    }

    #[test]
    fn override_replaces_default_case_insensitively() {
        let merged = merge_headers(
            &[h("Content-Type", "application/json")],
            &[h("content-type", "text/plain"), h("Authorization", "Bearer t")],
        );
        assert_eq!(
            merged,
            vec![h("content-type", "text/plain"), h("Authorization", "Bearer t")]
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost:3000/stylists".to_string(),
            headers: vec![h("Authorization", "Bearer abc")],
            body: None,
        };
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("content-type"), None);
    }
}
