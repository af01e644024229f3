//! Configuration loading for the bridge.
//!
//! Configuration is loaded from a TOML file named by `PUSHMOD_CONFIG`, or
//! given to [`install`](crate::install) directly. Every section and field is
//! optional.

use push_core::{Truncate, DEFAULT_MAX_LIVE_HANDLES, DEFAULT_MAX_PAYLOAD_BYTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the path of the config file.
pub const CONFIG_ENV: &str = "PUSHMOD_CONFIG";

/// Root configuration for the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Raw payload limits.
    #[serde(default)]
    pub payload: PayloadConfig,
    /// Handle registry limits.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Built-in display transforms.
    #[serde(default)]
    pub transform: TransformConfig,
    /// Reaction to invalid handle use.
    #[serde(default)]
    pub misuse: MisuseConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Raw payload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadConfig {
    /// Largest accepted payload in bytes (default: 64 KiB).
    #[serde(default = "default_max_payload_bytes")]
    pub max_bytes: usize,
}

/// Handle registry limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Most handles alive at once; construction fails beyond it (default: 1024).
    #[serde(default = "default_max_live_handles")]
    pub max_live_handles: usize,
}

/// Built-in display transforms, applied after the installed transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Title length cap in characters (default: 0 = no cap).
    #[serde(default)]
    pub max_title_chars: usize,
    /// Body length cap in characters (default: 0 = no cap).
    #[serde(default)]
    pub max_body_chars: usize,
    /// Marker appended to cut text (default: "…").
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

/// Reaction to invalid handle use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisuseConfig {
    /// Policy (default: `abort` in debug builds, `ignore` in release builds).
    #[serde(default)]
    pub policy: MisusePolicy,
}

/// What happens after a stale or unknown handle has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MisusePolicy {
    /// Abort the process right after logging.
    Abort,
    /// Log, then return the empty view or do nothing.
    Ignore,
}

impl Default for MisusePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            MisusePolicy::Abort
        } else {
            MisusePolicy::Ignore
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a stderr subscriber on first use (default: true).
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,
    /// Filter used when `RUST_LOG` is unset (default: "pushmod=info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_max_live_handles() -> usize {
    DEFAULT_MAX_LIVE_HANDLES
}

fn default_ellipsis() -> String {
    "\u{2026}".to_string()
}

fn default_logging_enabled() -> bool {
    true
}

fn default_log_filter() -> String {
    "pushmod=info".to_string()
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_payload_bytes(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_live_handles: default_max_live_handles(),
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_title_chars: 0,
            max_body_chars: 0,
            ellipsis: default_ellipsis(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            filter: default_log_filter(),
        }
    }
}

impl TransformConfig {
    /// The truncation these settings describe, if any cap is set.
    pub fn truncate(&self) -> Option<Truncate> {
        let cap = |chars: usize| (chars > 0).then_some(chars);
        let (title, body) = (cap(self.max_title_chars), cap(self.max_body_chars));
        if title.is_none() && body.is_none() {
            return None;
        }
        Some(Truncate::new(title, body).with_ellipsis(self.ellipsis.clone()))
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `PUSHMOD_CONFIG`, or defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payload.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "payload.max_bytes must be greater than 0".to_string(),
            ));
        }

        if self.registry.max_live_handles == 0 {
            return Err(ConfigError::Invalid(
                "registry.max_live_handles must be greater than 0".to_string(),
            ));
        }

        if let Err(e) = EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::Invalid(format!(
                "logging.filter `{}`: {}",
                self.logging.filter, e
            )));
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
