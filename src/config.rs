//! Configuration
//!
//! Loaded from `~/.config/socv3/config.toml` (or `--config`), then overridden
//! by environment variables. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Apps Script web app behind the proxy
pub const DEFAULT_UPSTREAM_URL: &str = "https://script.google.com/macros/s/AKfycbzMZl3qsIIIwIUAPGUk1JYt1CuPP3BI4Aq9WK5ZlAslrgNg4PPD5aQEcSe07Ce43stkLQ/exec";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Spreadsheet endpoint every request is forwarded to
    pub upstream_url: String,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Proxy endpoint the CLI talks to
    pub endpoint: String,

    /// Mirror drafts to the spreadsheet
    pub remote_drafts: bool,

    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://127.0.0.1:{}/api/proxy", DEFAULT_PORT),
            remote_drafts: true,
            timeout_secs: 20,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for drafts and the working form (default: platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// SOC V3 configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocConfig {
    pub proxy: ProxyConfig,
    pub client: ClientConfig,
    pub storage: StorageConfig,
}

impl SocConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("socv3").join("config.toml"))
    }

    /// Load from `path` (or the default location), then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let config = match path {
            Some(path) if path.exists() => Self::load_file(&path)?,
            _ => Self::default(),
        };

        config.with_env_overrides()
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SocConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply `SOC_*` overrides from a lookup function
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("SOC_UPSTREAM_URL") {
            self.proxy.upstream_url = url;
        }
        if let Some(endpoint) = lookup("SOC_PROXY_ENDPOINT") {
            self.client.endpoint = endpoint;
        }
        if let Some(port) = lookup("SOC_PORT") {
            self.proxy.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid SOC_PORT value: {}", port))?;
        }
        if let Some(dir) = lookup("SOC_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Directory holding drafts and the working form
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find a local data directory"))?;
        Ok(base.join("socv3"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = SocConfig::load_file(&temp.path().join("nope.toml"));
        assert!(config.is_err());

        let config = SocConfig::default();
        assert_eq!(config.proxy.port, DEFAULT_PORT);
        assert_eq!(config.proxy.upstream_url, DEFAULT_UPSTREAM_URL);
        assert!(config.client.remote_drafts);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[proxy]\nport = 8080\n\n[client]\nremote_drafts = false\n",
        )
        .unwrap();

        let config = SocConfig::load_file(&path).unwrap();
        assert_eq!(config.proxy.port, 8080);
        assert_eq!(config.proxy.bind, "127.0.0.1");
        assert!(!config.client.remote_drafts);
        assert_eq!(config.client.timeout_secs, 20);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut config = SocConfig::default();
        config.storage.data_dir = Some(temp.path().join("data"));
        config.save(&path).unwrap();

        assert_eq!(SocConfig::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SOC_UPSTREAM_URL", "http://upstream.test/exec"),
            ("SOC_PORT", "4100"),
            ("SOC_DATA_DIR", "/tmp/soc-data"),
        ]
        .into_iter()
        .collect();

        let config = SocConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.proxy.upstream_url, "http://upstream.test/exec");
        assert_eq!(config.proxy.port, 4100);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/soc-data"));
    }

    #[test]
    fn test_bad_port_override() {
        let result = SocConfig::default()
            .with_overrides(|key| (key == "SOC_PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }
}
