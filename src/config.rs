//! Configuration management for Netcord
//!
//! This module handles loading, parsing, and validating the engine
//! configuration from a YAML file and `NETCORD_*` environment variables.

use crate::error::{NetcordError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Provider REST base, including the API version
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Browser-facing authorize endpoint
pub const DEFAULT_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// Provider CDN used for avatar, icon and banner URLs
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com";

/// Scopes requested when none are configured
pub const DEFAULT_SCOPES: &[&str] = &["identify", "email", "guilds"];

/// How client credentials are presented to the token endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientAuthMethod {
    /// HTTP Basic with `client_id:client_secret`
    #[default]
    Basic,
    /// `client_id` and `client_secret` as form fields
    Body,
}

/// Main configuration structure for Netcord
///
/// Holds the OAuth2 application credentials issued by the provider together
/// with the engine-wide tuning knobs (timeouts, cache TTL, endpoints).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OAuth2 application (client) identifier
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 application secret
    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI registered with the provider
    #[serde(default)]
    pub redirect_uri: String,

    /// Scopes requested during authorization, in order
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Service (bot) credential for lookups outside a user session
    #[serde(default)]
    pub bot_token: Option<String>,

    /// `prompt` parameter of the authorization URL; empty disables it
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Provider REST base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Authorization endpoint the user is redirected to
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// CDN base for derived asset URLs
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Default time-to-live of cached identity lookups, in seconds
    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    /// Token endpoint client authentication
    #[serde(default)]
    pub client_auth: ClientAuthMethod,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

fn default_prompt() -> String {
    "consent".to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_cdn_base() -> String {
    DEFAULT_CDN_BASE.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_cache_ttl_seconds() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            scopes: default_scopes(),
            bot_token: None,
            prompt: default_prompt(),
            api_base: default_api_base(),
            authorize_url: default_authorize_url(),
            cdn_base: default_cdn_base(),
            timeout_seconds: default_timeout_seconds(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            client_auth: ClientAuthMethod::default(),
        }
    }
}

impl Config {
    /// Creates a configuration with the three mandatory application values
    /// and defaults for everything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use netcord::Config;
    ///
    /// let config = Config::new("1234", "secret", "https://app.example.com/callback");
    /// assert_eq!(config.scopes, vec!["identify", "email", "guilds"]);
    /// ```
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            ..Self::default()
        }
    }

    /// Load configuration from file and environment
    ///
    /// A missing file is not an error: defaults are used and the
    /// environment still applies on top.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NetcordError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| NetcordError::Config(format!("Failed to parse config: {}", e)))
    }

    fn apply_env_vars(&mut self) {
        if let Ok(client_id) = std::env::var("NETCORD_CLIENT_ID") {
            self.client_id = client_id;
        }

        if let Ok(client_secret) = std::env::var("NETCORD_CLIENT_SECRET") {
            self.client_secret = client_secret;
        }

        if let Ok(redirect_uri) = std::env::var("NETCORD_REDIRECT_URI") {
            self.redirect_uri = redirect_uri;
        }

        if let Ok(scopes) = std::env::var("NETCORD_SCOPES") {
            let parsed: Vec<String> = scopes
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            tracing::debug!(?parsed, "Env override: NETCORD_SCOPES");
            self.scopes = parsed;
        }

        if let Ok(bot_token) = std::env::var("NETCORD_BOT_TOKEN") {
            self.bot_token = Some(bot_token).filter(|t| !t.is_empty());
        }

        if let Ok(api_base) = std::env::var("NETCORD_API_BASE") {
            tracing::debug!(api_base = %api_base, "Env override: NETCORD_API_BASE");
            self.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("NETCORD_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid NETCORD_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(ttl) = std::env::var("NETCORD_CACHE_TTL_SECONDS") {
            if let Ok(value) = ttl.parse() {
                self.cache_ttl_seconds = value;
            } else {
                tracing::warn!("Invalid NETCORD_CACHE_TTL_SECONDS: {}", ttl);
            }
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(NetcordError::Config("client_id cannot be empty".to_string()));
        }

        if self.client_secret.trim().is_empty() {
            return Err(NetcordError::Config(
                "client_secret cannot be empty".to_string(),
            ));
        }

        url::Url::parse(&self.redirect_uri).map_err(|e| {
            NetcordError::Config(format!("Invalid redirect_uri {:?}: {}", self.redirect_uri, e))
        })?;

        for (name, value) in [
            ("api_base", &self.api_base),
            ("authorize_url", &self.authorize_url),
            ("cdn_base", &self.cdn_base),
        ] {
            url::Url::parse(value)
                .map_err(|e| NetcordError::Config(format!("Invalid {}: {}", name, e)))?;
        }

        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(NetcordError::Config(
                "at least one scope must be configured".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(NetcordError::Config(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
