//! Bearer credential utilities
//!
//! Common functions for reading and writing `Authorization: Bearer` headers.

use axum::http::{HeaderMap, HeaderValue, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header
///
/// ## Returns
/// * `Some(token)` - header present, uses the `Bearer` scheme and carries a non-empty token
/// * `None` - header absent, not valid ASCII, another scheme, or empty token
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Build an `Authorization` header value for a bearer token
pub fn bearer_header_value(token: &str) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!("{BEARER_PREFIX}{token}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_bearer_token_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_header_value_roundtrip() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer_header_value("tok").unwrap());
        assert_eq!(extract_bearer_token(&headers), Some("tok"));
    }
}
