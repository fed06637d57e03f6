use serde::{Deserialize, Serialize};

/// A mentionable role, as supplied by the guild-data fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// A mentionable channel, as supplied by the guild-data fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A template variable, as supplied by the plugin-metadata fetcher.
/// Variables are presented grouped by `category` in the suggestion surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
}

/// The externally supplied lookup lists for label resolution and
/// suggestions. The engine never fetches these itself; hosts hand a roster
/// to the editor and refresh it when their caches change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous role lookup by id. A miss is not an error; callers fall
    /// back to a generic label.
    pub fn role_name(&self, id: &str) -> Option<&str> {
        self.roles
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }

    /// Synchronous channel lookup by id.
    pub fn channel_name(&self, id: &str) -> Option<&str> {
        self.channels
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Variable lookup by key.
    pub fn variable(&self, key: &str) -> Option<&TemplateVariable> {
        self.variables.iter().find(|v| v.key == key)
    }
}
