//! Configuration management for the mirror.
//!
//! Loads configuration from a TOML file, then applies environment variable
//! overrides. Command-line overrides are applied by the binary on top.

use crate::utils::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_SOURCE: &str = "MIRROR_SOURCE";
pub const ENV_DESTINATION: &str = "MIRROR_DESTINATION";
pub const ENV_ASSETS: &str = "MIRROR_ASSETS";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Root the assets are resolved against
    #[serde(default)]
    pub source: PathBuf,

    /// Root the mirror is written to
    #[serde(default)]
    pub destination: PathBuf,

    /// Files or folders to mirror, relative to `source`
    #[serde(default)]
    pub assets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token
    pub token: String,

    /// Receiving chat
    pub chat_id: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Disallow forwarding/saving of the message
    #[serde(default = "default_protect_content")]
    pub protect_content: bool,
}

// Default values
fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_protect_content() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(ENV_SOURCE) {
            self.backup.source = PathBuf::from(source);
        }

        if let Some(destination) = lookup(ENV_DESTINATION) {
            self.backup.destination = PathBuf::from(destination);
        }

        if let Some(assets) = lookup(ENV_ASSETS) {
            self.backup.assets = split_assets(&assets);
        }

        if let (Some(token), Some(chat_id)) =
            (lookup(ENV_TELEGRAM_TOKEN), lookup(ENV_TELEGRAM_CHAT_ID))
        {
            match self.notify.telegram.as_mut() {
                Some(telegram) => {
                    telegram.token = token;
                    telegram.chat_id = chat_id;
                }
                None => {
                    self.notify.telegram = Some(TelegramConfig {
                        token,
                        chat_id,
                        api_url: default_api_url(),
                        protect_content: default_protect_content(),
                    });
                }
            }
        }
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.backup.source.as_os_str().is_empty() {
            return Err(MirrorError::Config("backup.source is not set".to_string()));
        }

        if self.backup.destination.as_os_str().is_empty() {
            return Err(MirrorError::Config("backup.destination is not set".to_string()));
        }

        if self.backup.assets.is_empty() {
            return Err(MirrorError::Config("backup.assets is empty".to_string()));
        }

        if let Some(telegram) = &self.notify.telegram {
            if telegram.token.is_empty() || telegram.chat_id.is_empty() {
                return Err(MirrorError::Config(
                    "notify.telegram needs both token and chat_id".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Split a `;`-separated asset list, dropping blank segments
pub fn split_assets(list: &str) -> Vec<String> {
    list.split(';')
        .map(str::trim)
        .filter(|asset| !asset.is_empty())
        .map(str::to_string)
        .collect()
}
