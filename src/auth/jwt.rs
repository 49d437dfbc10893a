//! Host session tokens
//!
//! After the provider login completes, a host usually issues its own
//! short-lived session token instead of handing the provider's access
//! token to the browser. [`SessionJwt`] signs those tokens with a shared
//! secret (HS256 unless configured otherwise) and stamps each with an `exp`
//! and a `type` claim, so an access token can never be used where a refresh
//! token is expected.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NetcordError, Result};

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_MINUTES: i64 = 30;

/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_DAYS: i64 = 7;

/// Value of the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies host session tokens.
///
/// # Examples
///
/// ```
/// use netcord::auth::{SessionJwt, TokenKind};
///
/// let jwt = SessionJwt::new("change-me");
/// let mut claims = serde_json::Map::new();
/// claims.insert("id".into(), "80351110224678912".into());
/// claims.insert("username".into(), "Nelly".into());
///
/// let token = jwt.create_token(&claims, TokenKind::Refresh).unwrap();
/// let pair = jwt.exchange_refresh_token(&token).unwrap();
///
/// let decoded = jwt.decode_token(&pair.access_token).unwrap();
/// assert_eq!(decoded["type"], "access");
/// assert_eq!(decoded["username"], "Nelly");
/// ```
#[derive(Clone)]
pub struct SessionJwt {
    secret: String,
    algorithm: Algorithm,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl std::fmt::Debug for SessionJwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionJwt")
            .field("algorithm", &self.algorithm)
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

impl SessionJwt {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            access_lifetime: Duration::minutes(DEFAULT_ACCESS_MINUTES),
            refresh_lifetime: Duration::days(DEFAULT_REFRESH_DAYS),
        }
    }

    /// Uses another HMAC algorithm (`HS384`, `HS512`).
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_lifetime = access;
        self.refresh_lifetime = refresh;
        self
    }

    /// Signs `claims` with `exp` and `type` added.
    ///
    /// Caller-supplied `exp` or `type` entries are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Config`] if signing fails, which only
    /// happens for a non-HMAC algorithm.
    pub fn create_token(&self, claims: &Map<String, Value>, kind: TokenKind) -> Result<String> {
        let lifetime = match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        };
        let exp = (Utc::now() + lifetime).timestamp();

        let mut payload = claims.clone();
        payload.insert("exp".to_string(), Value::from(exp));
        payload.insert("type".to_string(), Value::from(kind.as_str()));

        jsonwebtoken::encode(
            &Header::new(self.algorithm),
            &payload,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| NetcordError::Config(format!("failed to sign session token: {e}")))
    }

    /// Verifies the signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// Any verification failure (expired, bad signature, malformed) is a
    /// 401 [`NetcordError::Authentication`].
    pub fn decode_token(&self, token: &str) -> Result<Map<String, Value>> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let TokenData { claims, .. } = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            NetcordError::unauthorized(e.to_string())
        })?;

        Ok(claims)
    }

    /// Trades a refresh token for a new access/refresh pair.
    ///
    /// The new tokens carry only the `id` and `username` claims.
    ///
    /// # Errors
    ///
    /// - [`NetcordError::Authentication`] if the token does not verify.
    /// - [`NetcordError::InvalidRequest`] if it is not a refresh token or
    ///   lacks `id`/`username`.
    pub fn exchange_refresh_token(&self, refresh_token: &str) -> Result<SessionTokens> {
        let payload = self.decode_token(refresh_token)?;

        if payload.get("type").and_then(Value::as_str) != Some(TokenKind::Refresh.as_str()) {
            return Err(NetcordError::InvalidRequest(
                "the token type is required to be refresh".to_string(),
            ));
        }

        let mut claims = Map::new();
        for name in ["id", "username"] {
            let value = payload.get(name).cloned().ok_or_else(|| {
                NetcordError::InvalidRequest(format!("refresh token has no {name} claim"))
            })?;
            claims.insert(name.to_string(), value);
        }

        Ok(SessionTokens {
            access_token: self.create_token(&claims, TokenKind::Access)?,
            refresh_token: self.create_token(&claims, TokenKind::Refresh)?,
        })
    }
}
