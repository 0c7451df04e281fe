//! Configuration loading and secret resolution
//!
//! Settings come from two tiers, highest priority first:
//! 1. Environment variables
//! 2. TOML config file (`<config_dir>/trackmap/config.toml` unless overridden)
//!
//! A missing config file is not an error: defaults are used and a warning is logged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name used under the platform config/data directories
const APP_DIR: &str = "trackmap";

/// Config file name inside the app config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Placeholder sent in the User-Agent when no contact is configured
const DEFAULT_CONTACT: &str = "contact not configured";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Directory for mapping outputs and extracted audio
    pub output_dir: Option<PathBuf>,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// Spotify catalog credentials
    pub spotify: SpotifyConfig,
    /// Ollama-compatible AI judge endpoint
    pub ollama: OllamaConfig,
    /// Contact string for the User-Agent header (email or URL)
    pub contact: Option<String>,
    /// Audio extraction settings
    pub extract: ExtractConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level ("trace", "debug", "info", "warn", "error")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Spotify application credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Long-lived refresh token (required for liked songs)
    pub refresh_token: Option<String>,
    pub redirect_uri: Option<String>,
}

/// AI judge endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Full URL of the generate endpoint, e.g. `http://localhost:11434/api/generate`
    pub url: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Audio extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// yt-dlp executable (name on PATH or full path)
    pub ytdlp_path: Option<String>,
    /// Look up canonical metadata and cover art in MusicBrainz
    pub musicbrainz: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            musicbrainz: true,
        }
    }
}

/// Platform default config file path (`~/.config/trackmap/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Platform default output directory
pub fn default_output_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("output"))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

/// Load TOML configuration
///
/// `path` overrides the platform default location. A missing file yields defaults;
/// a file that exists but cannot be read or parsed is a configuration error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        warn!("Config file not found: {} (using defaults)", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded config: {}", path.display());
    Ok(config)
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve one setting from ENV → TOML
///
/// `env_vars` are checked in order; the first valid one wins over the TOML value.
/// Logs a warning when the setting is present in more than one tier.
pub fn resolve_setting(name: &str, env_vars: &[&str], toml_value: Option<&str>) -> Option<String> {
    let env_value = env_vars.iter().find_map(|var| {
        std::env::var(var)
            .ok()
            .filter(|v| is_valid_value(v))
            .map(|v| (*var, v))
    });
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config. Using environment (highest priority).",
            name
        );
    }

    if let Some((var, value)) = env_value {
        info!("{} loaded from environment variable {}", name, var);
        return Some(value.trim().to_string());
    }

    toml_value.map(|v| {
        info!("{} loaded from TOML config", name);
        v.trim().to_string()
    })
}

/// User-Agent string for outbound HTTP clients
///
/// MusicBrainz and Cover Art Archive require an identifying agent with contact info.
/// Without one, a placeholder is sent and a warning logged.
pub fn get_user_agent(contact: Option<&str>) -> String {
    let contact = match contact.filter(|c| is_valid_value(c)) {
        Some(c) => c.trim(),
        None => {
            warn!(
                "No contact configured (TRACKMAP_CONTACT or `contact` in config.toml); \
                 MusicBrainz may throttle anonymous clients"
            );
            DEFAULT_CONTACT
        }
    };
    format!("trackmap/{} ( {} )", env!("CARGO_PKG_VERSION"), contact)
}
