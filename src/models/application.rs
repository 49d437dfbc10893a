use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::cdn;

/// Application metadata from `/applications/@me`.
///
/// Only the commonly used fields are typed; everything else the provider
/// returns is kept in [`extra`](Self::extra).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bot_public: Option<bool>,
    #[serde(default)]
    pub bot_require_code_grant: Option<bool>,
    #[serde(default)]
    pub verify_key: Option<String>,
    #[serde(default)]
    pub flags: Option<u64>,
    #[serde(default)]
    pub owner: Option<User>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Application {
    pub fn icon_url(&self, cdn_base: &str) -> Option<String> {
        cdn::application_icon_url(cdn_base, &self.id, self.icon.as_deref())
    }
}

/// Result of token introspection via `/oauth2/@me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationInfo {
    pub application: Application,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub expires: DateTime<Utc>,
    /// Present only when the grant includes `identify`.
    #[serde(default)]
    pub user: Option<User>,
}
