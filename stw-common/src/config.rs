//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a single TOML file. Its location is
//! resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `STYLETWIN_CONFIG` environment variable
//! 3. `<config_dir>/styletwin/<module>.toml` (OS-dependent)
//!
//! A missing file is not an error: the service logs a warning and starts
//! with built-in defaults. A file that exists but cannot be parsed is.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STYLETWIN_CONFIG";

/// Prefix for secrets supplied through the environment
pub const SECRET_ENV_PREFIX: &str = "STYLETWIN_";

/// Default HTTP port for stw-match
pub const DEFAULT_PORT: u16 = 5741;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,

    /// HTTP server port
    pub port: u16,

    /// ISO 3166-1 country used when a request does not name one
    pub default_country: String,

    /// Timeout applied to every outbound provider request
    pub http_timeout_secs: u64,

    /// Randomize image search pages so repeated lookups show new looks
    pub image_variety: bool,

    /// Optional TOML file replacing the built-in lookup tables
    pub catalog_path: Option<PathBuf>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Third-party API credentials
    pub api_keys: ApiKeys,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            default_country: "US".to_string(),
            http_timeout_secs: 15,
            image_variety: true,
            catalog_path: None,
            logging: LoggingConfig::default(),
            api_keys: ApiKeys::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provider credentials as written in the TOML file
///
/// Every field may be overridden through the environment, see
/// [`resolve_secret`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub qloo: Option<String>,
    pub tmdb: Option<String>,
    pub unsplash: Option<String>,
    pub pexels: Option<String>,
    pub pixabay: Option<String>,
    pub lastfm: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

/// Config file resolution for one service module
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the config file path (CLI → ENV → OS default)
    ///
    /// Returns `None` only when no OS config directory can be determined
    /// and neither override is present.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        self.default_path()
    }

    /// OS-dependent default location
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| {
            d.join("styletwin")
                .join(format!("{}.toml", self.module_name))
        })
    }
}

/// Load TOML config, falling back to defaults when the file is absent
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No config file location available, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file not found: {} (using built-in defaults)",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))?;

    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Parse TOML config text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Validate a secret (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Environment variable name for a secret
///
/// `resolve_secret("tmdb_api_key", ..)` reads `STYLETWIN_TMDB_API_KEY`.
pub fn secret_env_var(name: &str) -> String {
    format!("{}{}", SECRET_ENV_PREFIX, name.to_uppercase())
}

/// Resolve a secret from 2-tier configuration
///
/// **Priority:** ENV → TOML. Blank values count as unset. Returns `None`
/// when no source provides a usable value; callers decide whether that is
/// fatal.
pub fn resolve_secret(name: &str, toml_value: Option<&str>) -> Option<String> {
    let env_name = secret_env_var(name);
    let env_value = std::env::var(&env_name).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in environment and TOML. Using environment (highest priority).",
            name
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable {}", name, env_name);
        return Some(value.trim().to_string());
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", name);
        return Some(value.trim().to_string());
    }

    None
}
