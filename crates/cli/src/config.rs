//! CLI configuration
//!
//! Layered as built-in defaults, then an optional config file, then `VIEWO_*`
//! environment variables (`VIEWO_API_BASE`, `VIEWO_STORAGE_KEYS__USER`, ...).

use anyhow::{Context, Result};
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use viewo_core::SessionConfig;

const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";
const ENV_PREFIX: &str = "VIEWO";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub session: SessionConfig,
    /// 0 disables the timeout
    pub request_timeout_secs: u64,
    /// Where the session file lives; defaults to the platform data dir
    pub state_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::new(DEFAULT_API_BASE),
            request_timeout_secs: 30,
            state_dir: None,
        }
    }
}

impl CliConfig {
    /// Load from the process environment and an optional file
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Self::load`], reading variables from `env` instead of the process
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder.build()?.try_deserialize()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Configured state dir, else the platform data dir
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }
        ProjectDirs::from("io", "viewo", "viewo")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine a state directory, pass --state-dir")
    }
}
