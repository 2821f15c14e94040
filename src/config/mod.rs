//! Configuration persistence
//!
//! Stores server credentials in ~/.hactar/config.json. The root directory can
//! be moved with the `HACTAR_HOME` environment variable.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.json";
const APP_VERSION: &str = "1.0.0";

/// Plex credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserConfig {
    pub token: String,
    pub server_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub version: String,
    pub config_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: APP_VERSION.to_string(),
            config_dir: "~/.hactar".to_string(),
        }
    }
}

/// Contents of config.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub user: UserConfig,
    pub app: AppConfig,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A usable server URL and token pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub server_url: String,
    pub token: String,
}

/// Loads and saves the config file under a root directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    root: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at `HACTAR_HOME`, or ~/.hactar
    pub fn new() -> Result<Self> {
        Ok(Self::with_root(default_root()?))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Load the config, falling back to defaults when no file exists
    pub fn load(&self) -> Result<ConfigFile> {
        let path = self.config_path();

        if !path.exists() {
            debug!("No config found at {:?}, using defaults", path);
            return Ok(ConfigFile::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: ConfigFile =
            serde_json::from_str(&contents).with_context(|| format!("Failed to parse config {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save the config, stamping `lastUpdated`
    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let path = self.config_path();

        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create config directory {:?}", self.root))?;

        let mut config = config.clone();
        config.last_updated = Some(Utc::now());

        let contents =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Merge new credentials into the stored config
    pub fn update_credentials(&self, server_url: &str, token: &str) -> Result<ConfigFile> {
        let mut config = self.load()?;
        config.user.server_url = server_url.trim().to_string();
        config.user.token = token.trim().to_string();
        self.save(&config)?;
        self.load()
    }

    /// Stored credentials, if both fields are set
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        let config = self.load()?;
        Ok(credentials_of(&config))
    }

    pub fn is_configured(&self) -> Result<bool> {
        Ok(!self.load()?.user.token.trim().is_empty())
    }
}

pub fn credentials_of(config: &ConfigFile) -> Option<Credentials> {
    let user = &config.user;
    if user.token.trim().is_empty() || user.server_url.trim().is_empty() {
        return None;
    }
    Some(Credentials {
        server_url: user.server_url.clone(),
        token: user.token.clone(),
    })
}

/// `HACTAR_HOME` if set, otherwise ~/.hactar
pub fn default_root() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("HACTAR_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".hactar"))
}
