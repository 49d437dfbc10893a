//! reqwest-backed [`Transport`]
//!
//! Requests are resolved against a base URL (normally
//! `https://discord.com/api/v10`) and each one is bounded by the configured
//! timeout. The client is shared and cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::{classify_response, ApiRequest, Body, Credential, Method, Transport};
use crate::error::{NetcordError, Result};

const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_REPOSITORY"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// HTTP transport for the provider REST and OAuth2 endpoints.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use netcord::transport::HttpTransport;
///
/// let transport = HttpTransport::new("https://discord.com/api/v10", Duration::from_secs(10)).unwrap();
/// assert_eq!(transport.base_url(), "https://discord.com/api/v10");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] if the base URL does not parse or
    /// the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url)
            .map_err(|e| NetcordError::Config(format!("invalid api_base {base_url:?}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetcordError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>> {
        let url = self.url_for(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.auth {
            Some(Credential::Bearer(token)) => builder.bearer_auth(token),
            Some(Credential::Bot(token)) => builder.header("Authorization", format!("Bot {token}")),
            Some(Credential::Basic {
                client_id,
                client_secret,
            }) => builder.basic_auth(client_id, Some(client_secret)),
            None => builder,
        };

        builder = match request.body {
            Some(Body::Form(pairs)) => builder.form(&pairs),
            Some(Body::Json(value)) => builder.json(&value),
            None => builder,
        };

        tracing::debug!(method = request.method.as_str(), path = %request.path, "Sending provider request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %request.path, error = %e, "Provider request failed");
            NetcordError::Transport(format!("{} {} failed: {e}", request.method.as_str(), request.path))
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            NetcordError::Transport(format!("failed to read response body: {e}"))
        })?;

        tracing::debug!(path = %request.path, status, bytes = bytes.len(), "Provider responded");

        let classified = classify_response(status, &bytes);
        if let Err(ref err) = classified {
            tracing::debug!(path = %request.path, status, error = %err, "Provider returned an error");
        }
        classified
    }
}
