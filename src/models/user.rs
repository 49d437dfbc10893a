use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cdn;
use crate::error::Result;
use crate::snowflake;

/// A provider user as returned by `/users/@me` or `/users/{id}`.
///
/// `email` and `verified` are only populated when the grant includes the
/// `email` scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Legacy four-digit tag; `"0"` or absent for migrated accounts.
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    /// Avatar hash.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub mfa_enabled: bool,
    /// Profile banner hash.
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub accent_color: Option<u32>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

impl User {
    /// Avatar URL, or the default avatar when no custom one is set.
    pub fn avatar_url(&self, cdn_base: &str) -> String {
        cdn::user_avatar_url(
            cdn_base,
            &self.id,
            self.avatar.as_deref(),
            self.discriminator.as_deref(),
        )
    }

    pub fn banner_url(&self, cdn_base: &str) -> Option<String> {
        cdn::user_banner_url(cdn_base, &self.id, self.banner.as_deref())
    }

    /// Name to show: the global display name when set, else the username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// Account creation time, from the id.
    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        snowflake::timestamp(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CDN: &str = "https://cdn.discordapp.com";

    fn parse(json: serde_json::Value) -> User {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_parses_full_user() {
        let user = parse(serde_json::json!({
            "id": "80351110224678912",
            "username": "Nelly",
            "discriminator": "1337",
            "avatar": "8342729096ea3675442027381ff50dfe",
            "verified": true,
            "email": "nelly@example.com",
            "flags": 64,
            "banner": "06c16474723fe537c283b8efa61a30c8",
            "accent_color": 16711680,
            "premium_type": 1,
            "public_flags": 64
        }));

        assert_eq!(user.username, "Nelly");
        assert!(user.verified);
        assert!(!user.bot);
        assert_eq!(user.accent_color, Some(16711680));
        assert_eq!(
            user.avatar_url(CDN),
            "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png?size=1024"
        );
        assert!(user.banner_url(CDN).is_some());
    }

    #[test]
    fn test_minimal_user_defaults() {
        let user = parse(serde_json::json!({"id": "1234567890", "username": "x"}));
        assert!(user.discriminator.is_none());
        assert!(!user.mfa_enabled);
        assert_eq!(user.display_name(), "x");
        assert_eq!(
            user.avatar_url(CDN),
            "https://cdn.discordapp.com/embed/avatars/0.png"
        );
        assert_eq!(user.banner_url(CDN), None);
    }

    #[test]
    fn test_created_at_from_id() {
        let user = parse(serde_json::json!({"id": "175928847299117063", "username": "x"}));
        assert_eq!(user.created_at().unwrap().timestamp_millis(), 1_462_015_105_796);
    }
}
