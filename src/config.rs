//! Configuration management for xseedtui
//!
//! Resolved once at startup and passed by reference to whatever needs it.
//! Layers, later wins:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`, else ~/.config/xseedtui/config.toml)
//! 3. Environment variables (a `.env` file in the working directory is loaded first)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CROSS_SEED_API_KEY is required")]
    MissingApiKey,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// cross-seed daemon connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossSeedConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
}

impl Default for CrossSeedConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 2468,
            api_key: String::new(),
        }
    }
}

impl CrossSeedConfig {
    pub fn base_url(&self) -> String {
        base_url(&self.host, self.port)
    }
}

/// qBittorrent WebUI connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QbitConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for QbitConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            username: "admin".into(),
            password: "adminadmin".into(),
        }
    }
}

impl QbitConfig {
    pub fn base_url(&self) -> String {
        base_url(&self.host, self.port)
    }
}

/// Build `scheme://host:port`, keeping a scheme the user already supplied
fn base_url(host: &str, port: u16) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub cross_seed: CrossSeedConfig,
    pub qbittorrent: QbitConfig,
    /// Directory for `cross-seed.log` (platform default when unset)
    pub log_dir: Option<PathBuf>,
}

// =============================================================================
// File Layer
// =============================================================================

/// On-disk representation; every field optional so files can be partial
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    cross_seed: Option<FileCrossSeed>,
    qbittorrent: Option<FileQbit>,
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileCrossSeed {
    host: Option<String>,
    port: Option<u16>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileQbit {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
}

impl Config {
    /// Default config file path (~/.config/xseedtui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xseedtui").join("config.toml"))
    }

    /// Config file `load` reads: the explicit one, else the default if it exists
    pub fn source_path(file: Option<&Path>) -> Option<PathBuf> {
        match file {
            Some(path) => Some(path.to_path_buf()),
            None => Self::path().filter(|p| p.exists()),
        }
    }

    /// Default log directory (platform local data dir)
    pub fn default_log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("xseedtui")
            .join("logs")
    }

    /// Effective log directory
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(Self::default_log_dir)
    }

    /// Resolve configuration from file and process environment
    ///
    /// An explicit `file` must exist; the default path is used only if present.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is normal
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Some(path) = Self::source_path(file) {
            config.merge_file(&path)?;
        }
        config.merge_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply a TOML file on top of the current values
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(())
    }

    /// Apply TOML text on top of the current values
    pub fn merge_toml(&mut self, text: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(text)?;

        if let Some(cs) = file.cross_seed {
            if let Some(host) = cs.host {
                self.cross_seed.host = host;
            }
            if let Some(port) = cs.port {
                self.cross_seed.port = port;
            }
            if let Some(api_key) = cs.api_key {
                self.cross_seed.api_key = api_key;
            }
        }
        if let Some(qb) = file.qbittorrent {
            if let Some(host) = qb.host {
                self.qbittorrent.host = host;
            }
            if let Some(port) = qb.port {
                self.qbittorrent.port = port;
            }
            if let Some(username) = qb.username {
                self.qbittorrent.username = username;
            }
            if let Some(password) = qb.password {
                self.qbittorrent.password = password;
            }
        }
        if file.log_dir.is_some() {
            self.log_dir = file.log_dir;
        }
        Ok(())
    }

    // =========================================================================
    // Environment Layer
    // =========================================================================

    /// Apply environment overrides read through `lookup`
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CROSS_SEED_HOST") {
            self.cross_seed.host = v;
        }
        if let Some(v) = lookup("CROSS_SEED_PORT") {
            self.cross_seed.port = parse_port("CROSS_SEED_PORT", &v)?;
        }
        if let Some(v) = lookup("CROSS_SEED_API_KEY") {
            self.cross_seed.api_key = v;
        }
        if let Some(v) = lookup("QBIT_HOST") {
            self.qbittorrent.host = v;
        }
        if let Some(v) = lookup("QBIT_PORT") {
            self.qbittorrent.port = parse_port("QBIT_PORT", &v)?;
        }
        if let Some(v) = lookup("QBIT_USERNAME") {
            self.qbittorrent.username = v;
        }
        if let Some(v) = lookup("QBIT_PASSWORD") {
            self.qbittorrent.password = v;
        }
        if let Some(v) = lookup("CROSS_SEED_LOG_DIR").filter(|v| !v.is_empty()) {
            self.log_dir = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Check required secrets before any network activity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cross_seed.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        })
}
