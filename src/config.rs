//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the optional backend login URL and the last used email,
//! plus the development/production environment toggle.
//!
//! Configuration is stored at `~/.config/gatehouse/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "gatehouse";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Build-mode toggle. Development enables debug logging of form submissions
/// and the session-inspector overlay; production disables both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `GATEHOUSE_ENV` overrides the build profile default.
    pub fn detect() -> Self {
        match std::env::var("GATEHOUSE_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("development") | Ok("dev") => Environment::Development,
            _ => {
                if cfg!(debug_assertions) {
                    Environment::Development
                } else {
                    Environment::Production
                }
            }
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session record.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Backend login URL, with the environment variable taking precedence
    /// over the config file. `None` selects the local stub.
    pub fn backend_url(&self) -> Option<String> {
        std::env::var("GATEHOUSE_BACKEND_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.backend_url.clone())
    }
}
