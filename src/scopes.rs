use serde::{Deserialize, Serialize};

use crate::error::{NetcordError, Result};

/// Well-known OAuth2 scopes of the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Scope {
    #[serde(rename = "identify")]
    Identify,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "connections")]
    Connections,

    #[serde(rename = "guilds")]
    Guilds,
    #[serde(rename = "guilds.join")]
    GuildsJoin,
    #[serde(rename = "guilds.members.read")]
    GuildsMembersRead,

    #[serde(rename = "bot")]
    Bot,
    #[serde(rename = "applications.commands")]
    ApplicationsCommands,
    #[serde(rename = "role_connections.write")]
    RoleConnectionsWrite,

    #[serde(rename = "messages.read")]
    MessagesRead,
    #[serde(rename = "openid")]
    OpenId,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Identify => "identify",
            Scope::Email => "email",
            Scope::Connections => "connections",
            Scope::Guilds => "guilds",
            Scope::GuildsJoin => "guilds.join",
            Scope::GuildsMembersRead => "guilds.members.read",
            Scope::Bot => "bot",
            Scope::ApplicationsCommands => "applications.commands",
            Scope::RoleConnectionsWrite => "role_connections.write",
            Scope::MessagesRead => "messages.read",
            Scope::OpenId => "openid",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, de-duplicated set of granted scopes.
///
/// Built once from configuration; membership checks never re-parse the
/// space-joined form. Unknown scope strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeSet {
    scopes: Vec<String>,
}

impl ScopeSet {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for scope in scopes {
            let scope = scope.as_ref().trim();
            if !scope.is_empty() && !set.contains(scope) {
                set.scopes.push(scope.to_string());
            }
        }
        set
    }

    /// Parses a space-separated scope string as sent by the provider.
    pub fn parse(joined: &str) -> Self {
        Self::new(joined.split_whitespace())
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Fails with [`NetcordError::ScopeMissing`] unless `scope` is present.
    pub fn require(&self, scope: Scope) -> Result<()> {
        if self.contains(scope.as_str()) {
            Ok(())
        } else {
            Err(NetcordError::ScopeMissing(scope.as_str().to_string()))
        }
    }

    /// The `scope` query value: scopes joined by a single space.
    pub fn joined(&self) -> String {
        self.scopes.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl From<&[Scope]> for ScopeSet {
    fn from(scopes: &[Scope]) -> Self {
        Self::new(scopes.iter().map(Scope::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_set_preserves_order_and_dedups() {
        let set = ScopeSet::new(["identify", "guilds", "identify", " ", "email"]);
        assert_eq!(set.joined(), "identify guilds email");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_require_missing_scope() {
        let set = ScopeSet::new(["email"]);
        match set.require(Scope::Identify) {
            Err(NetcordError::ScopeMissing(scope)) => assert_eq!(scope, "identify"),
            other => panic!("expected ScopeMissing, got {other:?}"),
        }
        let granted = ScopeSet::from(&[Scope::Identify, Scope::Email, Scope::Guilds][..]);
        assert!(granted.require(Scope::Guilds).is_ok());
    }

    #[test]
    fn test_parse_joined_and_unknown_scopes() {
        let set = ScopeSet::parse("identify  dm_channels.read");
        assert!(set.contains("dm_channels.read"));
        assert!(!set.contains("guilds"));
    }

    #[test]
    fn test_scope_serde_names_match_as_str() {
        for scope in [Scope::GuildsMembersRead, Scope::RoleConnectionsWrite, Scope::Identify] {
            let json = serde_json::to_string(&scope).unwrap();
            assert_eq!(json, format!("\"{}\"", scope.as_str()));
        }
    }
}
