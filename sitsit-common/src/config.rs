//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `SITSIT_CONFIG` environment variable
//! 3. `<config_dir>/sitsit/config.toml` if it exists
//! 4. Compiled defaults (fallback)
//!
//! A missing default config file is not an error. A config file that was
//! named explicitly (flag or environment) must exist.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SITSIT_CONFIG";

/// Environment variable overriding the similarity threshold
pub const THRESHOLD_ENV_VAR: &str = "SITSIT_SIMILARITY_THRESHOLD";

/// Minimum percentage similarity two group texts must exceed to match
pub const DEFAULT_SIMILARITY_THRESHOLD: u8 = 87;

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Affinity matching configuration (optional)
    #[serde(default)]
    pub affinity: AffinityConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Affinity matching configuration
///
/// `threshold` is the only recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AffinityConfig {
    /// Minimum percentage similarity required (0-100)
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl AffinityConfig {
    pub fn new(threshold: u8) -> Result<Self> {
        let config = Self { threshold };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold > 100 {
            return Err(Error::Config(format!(
                "similarity threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_threshold() -> u8 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.affinity.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Configuration resolved for one run
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// File the config came from, `None` when compiled defaults were used
    pub source: Option<PathBuf>,
}

/// Resolve which config file to read, following the priority order above
///
/// Returns `Ok(None)` when nothing was named and no default file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return require_existing(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return require_existing(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    Ok(default_config_file().filter(|p| p.exists()))
}

/// Load configuration, falling back to compiled defaults
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    match resolve_config_path(cli_arg)? {
        Some(path) => {
            let config = TomlConfig::load(&path)?;
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        None => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: None,
        }),
    }
}

/// Resolve the similarity threshold
///
/// Priority: command-line argument, then `SITSIT_SIMILARITY_THRESHOLD`,
/// then the TOML value (which already carries the compiled default).
pub fn resolve_threshold(cli_arg: Option<u8>, config: &TomlConfig) -> Result<AffinityConfig> {
    if let Some(threshold) = cli_arg {
        debug!(threshold, "Similarity threshold from command line");
        return AffinityConfig::new(threshold);
    }

    if let Ok(value) = std::env::var(THRESHOLD_ENV_VAR) {
        let threshold = value.trim().parse::<u8>().map_err(|e| {
            Error::Config(format!("{} must be an integer 0-100: {}", THRESHOLD_ENV_VAR, e))
        })?;
        debug!(threshold, "Similarity threshold from {}", THRESHOLD_ENV_VAR);
        return AffinityConfig::new(threshold);
    }

    debug!(threshold = config.affinity.threshold, "Similarity threshold from config");
    config.affinity.validate()?;
    Ok(config.affinity)
}

/// Default config file path for the platform (`~/.config/sitsit/config.toml` on Linux)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sitsit").join("config.toml"))
}

fn require_existing(path: PathBuf) -> Result<Option<PathBuf>> {
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!("Config file not found: {}", path.display())))
    }
}
