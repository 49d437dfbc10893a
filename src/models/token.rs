//! OAuth2 token record
//!
//! A [`Token`] is what the token endpoint returns for the authorization
//! code and refresh grants. The engine never stores it; the caller owns it
//! and decides where it lives between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Access token, optional refresh token and granted scopes.
///
/// `scope` accepts both the space-joined string the provider normally sends
/// and a JSON list; it is always serialized back as a space-joined string.
/// Unknown response fields are ignored.
///
/// # Examples
///
/// ```
/// use netcord::models::Token;
///
/// let token: Token = serde_json::from_str(
///     r#"{"access_token":"X","token_type":"Bearer","expires_in":604800,"scope":"identify guilds"}"#,
/// ).unwrap();
///
/// assert_eq!(token.bearer(), "Bearer X");
/// assert!(token.refresh_token.is_none());
/// assert_eq!(token.scopes().collect::<Vec<_>>(), vec!["identify", "guilds"]);
/// assert!(!token.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The access token presented as `Authorization: Bearer <token>`.
    pub access_token: String,

    /// The token type, `"Bearer"` for this provider.
    pub token_type: String,

    /// Lifetime of the access token in seconds, counted from
    /// [`obtained_at`](Self::obtained_at).
    pub expires_in: u64,

    /// Refresh token; absent for grants that cannot be renewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Granted scopes in the order the provider listed them.
    #[serde(
        default,
        deserialize_with = "deserialize_scope",
        serialize_with = "serialize_scope"
    )]
    pub scope: Vec<String>,

    /// When the token was received. Defaults to the moment of
    /// deserialization, so a freshly exchanged token is stamped "now".
    #[serde(default = "Utc::now", with = "chrono::serde::ts_seconds")]
    pub obtained_at: DateTime<Utc>,
}

impl Token {
    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Granted scopes.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.iter().map(String::as_str)
    }

    /// `true` when `scope` was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|s| s == scope)
    }

    /// Absolute expiry of the access token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        let secs = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        self.obtained_at
            .checked_add_signed(chrono::Duration::seconds(secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns `true` when the access token is expired or expires within
    /// the next 60 seconds.
    ///
    /// Purely local: no request is made and nothing is cached.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// [`is_expired`](Self::is_expired) evaluated at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let buffer = chrono::Duration::seconds(60);
        now >= self.expires_at() - buffer
    }

    /// Whether a refresh grant is possible for this token.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

fn deserialize_scope<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScope {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Option::<RawScope>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawScope::Joined(joined)) => joined.split_whitespace().map(str::to_string).collect(),
        Some(RawScope::List(list)) => list,
    })
}

fn serialize_scope<S>(scope: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&scope.join(" "))
}

// ---------------------------------------------------------------------------
// TokenTypeHint
// ---------------------------------------------------------------------------

/// `token_type_hint` sent with a revocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenTypeHint::AccessToken => "access_token",
            TokenTypeHint::RefreshToken => "refresh_token",
        }
    }
}

impl std::str::FromStr for TokenTypeHint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "access_token" => Ok(TokenTypeHint::AccessToken),
            "refresh_token" => Ok(TokenTypeHint::RefreshToken),
            other => Err(format!(
                "unknown token type hint {other:?}, expected access_token or refresh_token"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_with(expires_in: u64, obtained_at: DateTime<Utc>) -> Token {
        Token {
            access_token: "tok".to_string(),
            token_type: "Bearer".to_string(),
            expires_in,
            refresh_token: None,
            scope: vec![],
            obtained_at,
        }
    }

    #[test]
    fn test_minimal_response_has_no_refresh_token() {
        let token: Token = serde_json::from_str(
            r#"{"access_token":"X","token_type":"Bearer","expires_in":604800}"#,
        )
        .unwrap();
        assert_eq!(token.access_token, "X");
        assert!(token.refresh_token.is_none());
        assert!(token.scope.is_empty());
        assert!(!token.can_refresh());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let token: Token = serde_json::from_str(
            r#"{"access_token":"X","token_type":"Bearer","expires_in":1,"webhook":{"id":"1"},"guild":null}"#,
        )
        .unwrap();
        assert_eq!(token.expires_in, 1);
    }

    #[test]
    fn test_scope_accepts_list() {
        let token: Token = serde_json::from_str(
            r#"{"access_token":"X","token_type":"Bearer","expires_in":1,"scope":["identify","email"]}"#,
        )
        .unwrap();
        assert!(token.has_scope("email"));
        assert_eq!(
            serde_json::to_value(&token).unwrap()["scope"],
            "identify email"
        );
    }

    #[test]
    fn test_missing_access_token_is_rejected() {
        let result =
            serde_json::from_str::<Token>(r#"{"token_type":"Bearer","expires_in":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_expiry_with_buffer() {
        let now = Utc::now();
        let token = token_with(3600, now);
        assert!(!token.is_expired_at(now));
        assert!(!token.is_expired_at(now + Duration::seconds(3539)));
        assert!(token.is_expired_at(now + Duration::seconds(3540)));
    }

    #[test]
    fn test_obtained_at_survives_serialization() {
        let original = token_with(10, Utc::now() - Duration::hours(2));
        let json = serde_json::to_string(&original).unwrap();
        let restored: Token = serde_json::from_str(&json).unwrap();
        assert!(restored.is_expired());
        assert_eq!(
            restored.obtained_at.timestamp(),
            original.obtained_at.timestamp()
        );
    }

    #[test]
    fn test_type_hint_parsing() {
        assert_eq!(
            "refresh_token".parse::<TokenTypeHint>().unwrap(),
            TokenTypeHint::RefreshToken
        );
        assert!("id_token".parse::<TokenTypeHint>().is_err());
        assert_eq!(TokenTypeHint::AccessToken.as_str(), "access_token");
    }
}
