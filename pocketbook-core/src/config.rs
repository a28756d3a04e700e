//! Configuration management
//!
//! Reads `config.json` from the app directory:
//! ```json
//! {
//!   "api": { "baseUrl": "https://...", "apiKey": "...", "sendAuthorization": true }
//! }
//! ```
//! Environment variables `POCKETBOOK_BASE_URL` and `POCKETBOOK_API_KEY`
//! override the file (for CI/testing and one-off runs).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Raw config.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    // Preserve fields this client does not manage
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    api_key: String,
    #[serde(default = "default_send_authorization")]
    send_authorization: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            send_authorization: default_send_authorization(),
        }
    }
}

fn default_send_authorization() -> bool {
    true
}

/// Pocketbook configuration (simplified view of the settings file)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    /// Attach the bearer header on record-collection requests; off for
    /// deployments that run with row-level security disabled
    pub send_authorization: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            send_authorization: true,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the app directory, applying env overrides
    pub fn load(app_dir: &Path) -> Result<Self> {
        let settings_path = app_dir.join("config.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let base_url = std::env::var("POCKETBOOK_BASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| raw.api.base_url.clone());
        let api_key = std::env::var("POCKETBOOK_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| raw.api.api_key.clone());

        Ok(Self {
            base_url,
            api_key,
            send_authorization: raw.api.send_authorization,
            _raw_settings: raw,
        })
    }

    /// Save config to the app directory
    /// Preserves settings the client doesn't manage
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("config.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.api.base_url = self.base_url.clone();
        settings.api.api_key = self.api_key.clone();
        settings.api.send_authorization = self.send_authorization;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Fail early when the remote endpoint is not configured
    pub fn require_api(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config(
                "API base URL not configured; set api.baseUrl in config.json \
                 or the POCKETBOOK_BASE_URL environment variable"
                    .to_string(),
            ));
        }
        if self.api_key.is_empty() {
            return Err(Error::Config(
                "API key not configured; set api.apiKey in config.json \
                 or the POCKETBOOK_API_KEY environment variable"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
