use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TELEGRAM_API_URL};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub validator_address: String,
    pub rpc_endpoint: String,
    pub telegram_bot_token: String,
    #[serde(deserialize_with = "deserialize_chat_id")]
    pub telegram_chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

impl Config {
    /// Load a config from a `.json` file, or YAML for any other extension.
    /// Relative `logs_path` values are resolved against the file's directory.
    pub fn from_filepath(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        let mut config = Self::parse(&content, ConfigFormat::of(path))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        if let Some(logs_path_buf) = config.logs_path {
            let abs_logs_path = to_absolute_path(config_dir, logs_path_buf.as_path())?;
            config.logs_path = Some(abs_logs_path);
        }

        Ok(config)
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Config> {
        let config = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(config)
    }

    /// Write the config, choosing the format from the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match ConfigFormat::of(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Starter config written by `validator-monitor init`
    pub fn template() -> Self {
        Self {
            validator_address: "0x0000000000000000000000000000000000000000".to_string(),
            rpc_endpoint: "http://localhost:1317".to_string(),
            telegram_bot_token: "<bot token>".to_string(),
            telegram_chat_id: "<chat id>".to_string(),
            telegram_api_url: None,
            poll_interval_secs: Some(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            logs_path: None,
            logs_enabled: Some(true),
            log_level: Some("info".to_string()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.validator_address.trim().is_empty() {
            bail!("validator_address must not be empty");
        }
        if !(self.rpc_endpoint.starts_with("http://") || self.rpc_endpoint.starts_with("https://")) {
            bail!("rpc_endpoint must be an http(s) URL, got '{}'", self.rpc_endpoint);
        }
        if self.telegram_bot_token.trim().is_empty() {
            bail!("telegram_bot_token must not be empty");
        }
        if self.telegram_chat_id.trim().is_empty() {
            bail!("telegram_chat_id must not be empty");
        }
        if self.poll_interval_secs == Some(0) {
            bail!("poll_interval_secs must be greater than zero");
        }
        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn telegram_api_url(&self) -> &str {
        self.telegram_api_url.as_deref().unwrap_or(DEFAULT_TELEGRAM_API_URL)
    }
}

/// Chat ids are numeric in Telegram but often written quoted; accept both.
fn deserialize_chat_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChatId {
        Number(i64),
        Text(String),
    }

    Ok(match ChatId::deserialize(deserializer)? {
        ChatId::Number(id) => id.to_string(),
        ChatId::Text(id) => id,
    })
}

pub fn to_absolute_path<P: AsRef<Path>>(base_dir: P, relative_path: P) -> Result<PathBuf> {
    let path = relative_path.as_ref();

    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let base_dir = base_dir.as_ref().canonicalize()?;
        Ok(base_dir.join(path))
    }
}
