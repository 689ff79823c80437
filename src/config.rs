// src/config.rs

//! Configuration structures for the display renderer and device client.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only needs the keys it wants to change. The file is JSON, found via
//! the `PIXOO_CONFIG` environment variable; `PIXOO_HOST` overrides the device
//! host from any source.

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "PIXOO_CONFIG";
/// Environment variable overriding `device.host`.
pub const HOST_ENV: &str = "PIXOO_HOST";

/// Process-wide configuration, loaded on first use.
///
/// A missing or unreadable file falls back to defaults with a warning; use
/// [`Config::load_from`] where a bad file should be a hard error.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match Config::from_env() {
    Ok(config) => config,
    Err(e) => {
        warn!("Falling back to default configuration: {}", e);
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }
});

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Framebuffer geometry.
    pub display: DisplayConfig,
    /// Device host and protocol timing.
    pub device: DeviceConfig,
}

impl Config {
    /// Reads a JSON config file. Keys missing from the file keep defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads from `PIXOO_CONFIG` if set, otherwise defaults, then applies
    /// environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading configuration from {}", path.display());
                Config::load_from(&path)?
            }
            None => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(HOST_ENV) {
            if !host.trim().is_empty() {
                self.device.host = host.trim().to_string();
            }
        }
    }
}

// --- Display Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 64,
            height: 64,
        }
    }
}

// --- Device Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    /// Host name or IP address of the display; requests go to `http://<host>/post`.
    pub host: String,
    /// Deadline for every outbound command.
    pub request_timeout_ms: u64,
    /// Pause between the two handshake commands.
    pub settle_delay_ms: u64,
    /// Channel selected during the handshake. 3 is the custom drawing channel.
    pub channel_index: u32,
    /// A device counts as ready for this long after a successful push.
    pub readiness_window_secs: u64,
    /// Initialization retry policy.
    pub retry: RetryConfig,
}

impl DeviceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn readiness_window(&self) -> Duration {
        Duration::from_secs(self.readiness_window_secs)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            host: "pixoo.local".to_string(),
            request_timeout_ms: 5_000,
            settle_delay_ms: 100,
            channel_index: 3,
            readiness_window_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Exponential backoff for the initialization handshake:
/// `min(base * 2^attempt + jitter, cap)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total handshake attempts before giving up, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub cap_delay_ms: u64,
    /// Upper bound of the uniform random jitter added to each delay.
    pub max_jitter_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 5,
            base_delay_ms: 500,
            cap_delay_ms: 10_000,
            max_jitter_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_protocol() {
        let config = Config::default();
        assert_eq!((config.display.width, config.display.height), (64, 64));
        assert_eq!(config.device.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.device.readiness_window(), Duration::from_secs(30));
        assert_eq!(config.device.channel_index, 3);
        assert_eq!(config.device.retry.max_jitter_ms, 100);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("pixoo-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "device": { "host": "10.0.0.7", "retry": { "max_attempts": 2 } } }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.device.host, "10.0.0.7");
        assert_eq!(config.device.retry.max_attempts, 2);
        assert_eq!(config.device.retry.base_delay_ms, 500);
        assert_eq!(config.display, DisplayConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("pixoo-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load_from(Path::new("/no/such/pixoo.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
