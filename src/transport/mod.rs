//! Provider transport abstraction
//!
//! This module defines the [`Transport`] trait the engine uses for every
//! provider request. Implementations:
//!
//! - [`http::HttpTransport`] -- reqwest client against the configured API
//!   base URL.
//! - `fake::FakeTransport` -- scripted in-process transport used by unit
//!   tests (cfg(test) only).
//!
//! # Response classification
//!
//! Every implementation funnels the raw status and body through
//! [`classify_response`], so the rules are identical everywhere:
//!
//! - 2xx with an empty body yields `Ok(None)`.
//! - 2xx with a JSON body yields `Ok(Some(value))`; non-JSON is a
//!   [`NetcordError::Decode`].
//! - Anything else is a [`NetcordError::Upstream`] carrying the status and
//!   a detail string taken from the provider's error body.
//!
//! Network failures surface as [`NetcordError::Transport`]. Nothing here
//! retries.

pub mod http;

#[cfg(test)]
pub mod fake;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NetcordError, Result};

pub use http::HttpTransport;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    Json(Value),
}

/// Credential attached as the `Authorization` header.
#[derive(Clone, PartialEq)]
pub enum Credential {
    /// End-user access token.
    Bearer(String),
    /// Service (bot) token.
    Bot(String),
    /// Client credentials as HTTP Basic auth.
    Basic {
        client_id: String,
        client_secret: String,
    },
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Credential::Bot(_) => f.write_str("Bot(<redacted>)"),
            Credential::Basic { client_id, .. } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// A single provider request.
///
/// `path` is relative to the transport's base URL and starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
    pub auth: Option<Credential>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            auth: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(Body::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(Body::Json(value));
        self
    }

    pub fn auth(mut self, credential: Credential) -> Self {
        self.auth = Some(credential);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the form field `name`, if this is a form request.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            Some(Body::Form(pairs)) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Abstraction over the HTTP client used to reach the provider.
///
/// The engine holds it as `Arc<dyn Transport>`, so a host can substitute
/// its own client (proxying, metrics, a test double).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends `request` and classifies the response.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::Transport`] when no response was received.
    /// - [`NetcordError::Upstream`] for a non-2xx status.
    /// - [`NetcordError::Decode`] when a 2xx body is not JSON.
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>>;
}

/// Applies the response classification rules to a raw status and body.
pub fn classify_response(status: u16, body: &[u8]) -> Result<Option<Value>> {
    if (200..300).contains(&status) {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        return serde_json::from_slice(body)
            .map(Some)
            .map_err(|e| NetcordError::Decode(format!("response body is not JSON: {e}")));
    }

    Err(NetcordError::Upstream {
        status,
        detail: error_detail(status, body),
    })
}

/// Extracts a readable detail from a provider error body.
///
/// OAuth errors carry `error` and `error_description`; API errors carry
/// `message`. Anything else, HTML error pages included, yields
/// `"HTTP {status}"`.
pub fn error_detail(status: u16, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        let field = |name: &str| {
            map.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        match (field("error"), field("error_description")) {
            (Some(error), Some(description)) => return format!("{error}: {description}"),
            (Some(error), None) => return error.to_string(),
            (None, Some(description)) => return description.to_string(),
            (None, None) => {}
        }
        if let Some(message) = field("message") {
            return message.to_string();
        }
    }

    format!("HTTP {status}")
}

/// Deserializes a classified body into `T`.
///
/// An absent body is treated as JSON `null`, so `Option<T>` targets accept
/// it and anything else reports a decode error.
pub fn decode<T: DeserializeOwned>(body: Option<Value>) -> Result<T> {
    serde_json::from_value(body.unwrap_or(Value::Null))
        .map_err(|e| NetcordError::Decode(format!("unexpected response shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_json() {
        let value = classify_response(200, br#"{"id":"1"}"#).unwrap();
        assert_eq!(value, Some(serde_json::json!({"id": "1"})));
    }

    #[test]
    fn test_success_with_empty_body() {
        assert_eq!(classify_response(204, b"").unwrap(), None);
        assert_eq!(classify_response(200, b"  \n").unwrap(), None);
    }

    #[test]
    fn test_success_with_non_json_is_decode_error() {
        let err = classify_response(200, b"<html>").unwrap_err();
        assert!(matches!(err, NetcordError::Decode(_)));
    }

    #[test]
    fn test_oauth_error_body() {
        let err = classify_response(
            400,
            br#"{"error":"invalid_grant","error_description":"Invalid \"code\" in request."}"#,
        )
        .unwrap_err();
        match err {
            NetcordError::Upstream { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, r#"invalid_grant: Invalid "code" in request."#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail(400, br#"{"error":"invalid_client"}"#), "invalid_client");
        assert_eq!(
            error_detail(401, br#"{"message":"401: Unauthorized","code":0}"#),
            "401: Unauthorized"
        );
        assert_eq!(error_detail(502, b"Bad Gateway"), "HTTP 502");
        assert_eq!(error_detail(500, b""), "HTTP 500");
        assert_eq!(error_detail(500, b"{}"), "HTTP 500");
    }

    #[test]
    fn test_error_detail_ignores_html_error_pages() {
        let page = format!("<html><body>{}</body></html>", "x".repeat(5000));
        assert_eq!(error_detail(502, page.as_bytes()), "HTTP 502");

        let err = classify_response(503, page.as_bytes()).unwrap_err();
        match err {
            NetcordError::Upstream { status, detail } => {
                assert_eq!(status, 503);
                assert_eq!(detail, "HTTP 503");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_list_and_null() {
        let ids: Vec<String> = decode(Some(serde_json::json!(["a", "b"]))).unwrap();
        assert_eq!(ids, vec!["a", "b"]);

        let none: Option<String> = decode(None).unwrap();
        assert!(none.is_none());

        let err = decode::<Vec<String>>(None).unwrap_err();
        assert!(matches!(err, NetcordError::Decode(_)));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let rendered = format!(
            "{:?}",
            Credential::Basic {
                client_id: "id".into(),
                client_secret: "s3cret".into()
            }
        );
        assert!(!rendered.contains("s3cret"));
        assert!(!format!("{:?}", Credential::Bearer("tok".into())).contains("tok"));
    }
}
