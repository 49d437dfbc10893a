//! Error types for Netcord
//!
//! Every failure the engine can report is a variant of [`NetcordError`].
//! Local preconditions (missing scope, missing service credential, malformed
//! `Authorization` header) are raised before any network call; provider and
//! network failures are surfaced as-is and never retried here.

use thiserror::Error;

/// Main error type for Netcord operations
///
/// Hosts are expected to `match` on the variant to decide how to respond to
/// their own callers; [`NetcordError::status_code`] gives the HTTP status a
/// web backend would normally map each variant to.
#[derive(Error, Debug)]
pub enum NetcordError {
    /// Network-level failure (connection refused, timeout, DNS). Not
    /// attributable to the provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status
    #[error("Upstream error (HTTP {status}): {detail}")]
    Upstream {
        /// HTTP status returned by the provider
        status: u16,
        /// Human-readable detail extracted from the error body
        detail: String,
    },

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The token, refresh or revoke endpoint rejected the request
    #[error("Token exchange error (HTTP {status}): {detail}")]
    TokenExchange {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Detail extracted from the error body
        detail: String,
    },

    /// Missing or rejected bearer credential
    #[error("Authentication error (HTTP {status}): {detail}")]
    Authentication {
        /// HTTP status to surface (401 for local failures)
        status: u16,
        /// What went wrong
        detail: String,
    },

    /// A required scope is not part of the configured grant
    #[error("Required scope <{0}> is missing")]
    ScopeMissing(String),

    /// CSRF state mismatch or unknown session
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A credential the operation depends on is not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// The caller supplied input the operation cannot accept
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NetcordError {
    /// Builds an [`NetcordError::Authentication`] with status 401.
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Authentication {
            status: 401,
            detail: detail.into(),
        }
    }

    /// Returns the HTTP status a host would normally answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Upstream { status, .. }
            | Self::TokenExchange { status, .. }
            | Self::Authentication { status, .. } => *status,
            Self::Forbidden(_) | Self::ScopeMissing(_) => 403,
            Self::InvalidRequest(_) => 400,
            Self::Transport(_) | Self::Decode(_) => 502,
            Self::MissingCredentials(_) | Self::Config(_) => 500,
        }
    }

    /// Returns `true` for configuration and input failures that are decided
    /// locally, without any request reaching the provider.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ScopeMissing(_)
                | Self::MissingCredentials(_)
                | Self::InvalidRequest(_)
                | Self::Config(_)
        )
    }
}

impl From<serde_json::Error> for NetcordError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for Netcord operations
pub type Result<T> = std::result::Result<T, NetcordError>;
