//! Session configuration

use serde::{Deserialize, Serialize};

/// Keys under which the session is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub access_token: String,
    pub refresh_token: String,
    pub user: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            access_token: "viewo_access_token".to_string(),
            refresh_token: "viewo_refresh_token".to_string(),
            user: "viewo_user".to_string(),
        }
    }
}

impl StorageKeys {
    /// All keys, in the order they are written on login
    pub fn all(&self) -> [&str; 3] {
        [&self.access_token, &self.refresh_token, &self.user]
    }
}

/// Configuration for a [`SessionStore`](crate::session::SessionStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the admin API, without trailing slash (e.g. `/api/v1`)
    pub api_base: String,
    /// Storage keys for the persisted session
    pub storage_keys: StorageKeys,
    /// A token expiring within this many seconds is treated as expired
    pub expiry_skew_secs: u32,
    /// Refresh this many seconds before the access token expires
    pub refresh_lead_secs: u32,
    /// When the lead time has already passed by less than this, refresh at once
    pub immediate_refresh_window_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            storage_keys: StorageKeys::default(),
            expiry_skew_secs: 60,
            refresh_lead_secs: 120,
            immediate_refresh_window_secs: 60,
        }
    }
}

impl SessionConfig {
    /// Create a configuration for the given API base
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    /// Full URL of an API endpoint, `path` starting with `/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    pub(crate) fn expiry_skew_millis(&self) -> i64 {
        i64::from(self.expiry_skew_secs) * 1000
    }

    pub(crate) fn refresh_lead_millis(&self) -> i64 {
        i64::from(self.refresh_lead_secs) * 1000
    }

    pub(crate) fn immediate_refresh_window_millis(&self) -> i64 {
        i64::from(self.immediate_refresh_window_secs) * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = SessionConfig::new("http://localhost:8000/api/v1/");
        assert_eq!(
            config.endpoint("/auth/login"),
            "http://localhost:8000/api/v1/auth/login"
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"api_base": "https://admin.example/api/v1"}"#).unwrap();
        assert_eq!(config.api_base, "https://admin.example/api/v1");
        assert_eq!(config.refresh_lead_secs, 120);
        assert_eq!(config.storage_keys.user, "viewo_user");
    }
}
