use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cdn;

/// `ADMINISTRATOR` permission bit.
pub const ADMINISTRATOR: u64 = 0x8;

/// Partial guild from `/users/@me/guilds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    /// Whether the current user owns the guild.
    #[serde(default)]
    pub owner: Option<bool>,
    /// The current user's permission bit set, as a decimal string.
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub features: Option<BTreeSet<String>>,
}

/// Coarse role of the current user in a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuildRole {
    Owner,
    Admin,
    Member,
}

impl Guild {
    pub fn icon_url(&self, cdn_base: &str) -> Option<String> {
        cdn::guild_icon_url(cdn_base, &self.id, self.icon.as_deref())
    }

    pub fn banner_url(&self, cdn_base: &str) -> Option<String> {
        cdn::guild_banner_url(cdn_base, &self.id, self.banner.as_deref())
    }

    /// Parsed permission bits; `None` when absent or not a number.
    pub fn permission_bits(&self) -> Option<u64> {
        self.permissions.as_deref()?.parse().ok()
    }

    /// Owner first, then the administrator bit, otherwise member.
    pub fn member_role(&self) -> GuildRole {
        if self.owner == Some(true) {
            return GuildRole::Owner;
        }
        match self.permission_bits() {
            Some(bits) if bits & ADMINISTRATOR != 0 => GuildRole::Admin,
            _ => GuildRole::Member,
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features
            .as_ref()
            .is_some_and(|features| features.contains(feature))
    }
}
