//! Logged-in user profile

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Avatar initial shown when the profile has no display name
pub const DEFAULT_AVATAR_INITIAL: char = 'A';

/// User profile returned by the login endpoint, stored as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Any other fields the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Create a profile with only a username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            name: None,
            email: None,
            role: None,
            extra: Map::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn non_empty_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Name shown in the header: the display name, else the username
    pub fn display_name(&self) -> &str {
        self.non_empty_name().unwrap_or(&self.username)
    }

    /// First character of the display name for the avatar
    pub fn avatar_initial(&self) -> char {
        self.non_empty_name()
            .and_then(|name| name.chars().next())
            .unwrap_or(DEFAULT_AVATAR_INITIAL)
    }
}
