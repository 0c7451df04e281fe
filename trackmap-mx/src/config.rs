//! Configuration resolution for trackmap-mx
//!
//! Secrets resolve ENV → TOML (see [`trackmap_common::config::resolve_setting`]).
//! Missing credentials are reported when a batch starts, not at process start,
//! so the service can still serve `/health` and downloads without them.

use crate::services::{CatalogAccess, JudgeSettings};
use std::path::PathBuf;
use std::time::Duration;
use trackmap_common::config::{default_output_dir, resolve_setting, TomlConfig};
use trackmap_common::{Error, Result};
use tracing::info;

/// Default AI judge HTTP timeout
const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 60;

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub youtube_api_key: Option<String>,
    pub catalog_access: CatalogAccess,
    /// Present only when both endpoint URL and model are configured
    pub judge: Option<JudgeSettings>,
    pub output_dir: PathBuf,
}

impl ServiceSettings {
    /// Resolve all settings from ENV and TOML; `output_override` (CLI) wins for the output dir
    pub fn resolve(toml_config: &TomlConfig, output_override: Option<PathBuf>) -> Self {
        let output_dir = output_override
            .or_else(|| toml_config.output_dir.clone())
            .unwrap_or_else(default_output_dir);

        Self {
            youtube_api_key: resolve_setting(
                "YouTube API key",
                &["TRACKMAP_YOUTUBE_API_KEY", "YOUTUBE_API_KEY"],
                toml_config.youtube_api_key.as_deref(),
            ),
            catalog_access: resolve_catalog_access(toml_config),
            judge: resolve_judge_settings(toml_config),
            output_dir,
        }
    }

    /// YouTube key, or a configuration error naming every place it can be set
    pub fn require_youtube_api_key(&self) -> Result<&str> {
        self.youtube_api_key.as_deref().ok_or_else(|| {
            Error::Config(
                "YouTube API key not configured. Please configure using one of:\n\
                 1. Environment: TRACKMAP_YOUTUBE_API_KEY=your-key (or YOUTUBE_API_KEY)\n\
                 2. TOML: youtube_api_key = \"your-key\" in ~/.config/trackmap/config.toml"
                    .to_string(),
            )
        })
    }

    /// Catalog access, or a configuration error when client credentials are missing
    pub fn require_catalog_access(&self) -> Result<&CatalogAccess> {
        if self.catalog_access.has_client_credentials() {
            Ok(&self.catalog_access)
        } else {
            Err(Error::Config(
                "Spotify client credentials not configured. Please configure using one of:\n\
                 1. Environment: SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET\n\
                 2. TOML: [spotify] client_id / client_secret in ~/.config/trackmap/config.toml"
                    .to_string(),
            ))
        }
    }
}

/// Resolve catalog credentials into an explicit access value
pub fn resolve_catalog_access(toml_config: &TomlConfig) -> CatalogAccess {
    let spotify = &toml_config.spotify;
    CatalogAccess {
        client_id: resolve_setting(
            "Spotify client id",
            &["SPOTIFY_CLIENT_ID"],
            spotify.client_id.as_deref(),
        )
        .unwrap_or_default(),
        client_secret: resolve_setting(
            "Spotify client secret",
            &["SPOTIFY_CLIENT_SECRET"],
            spotify.client_secret.as_deref(),
        )
        .unwrap_or_default(),
        refresh_token: resolve_setting(
            "Spotify refresh token",
            &["SPOTIFY_REFRESH_TOKEN"],
            spotify.refresh_token.as_deref(),
        ),
    }
}

/// Resolve AI judge settings; `None` disables the judge
pub fn resolve_judge_settings(toml_config: &TomlConfig) -> Option<JudgeSettings> {
    let ollama = &toml_config.ollama;
    let url = resolve_setting("Ollama URL", &["OLLAMA_URL"], ollama.url.as_deref());
    let model = resolve_setting("Ollama model", &["OLLAMA_MODEL"], ollama.model.as_deref());

    match (url, model) {
        (Some(url), Some(model)) => {
            info!(url = %url, model = %model, "AI judge enabled");
            Some(JudgeSettings {
                url,
                model,
                timeout: Duration::from_secs(
                    ollama.timeout_secs.unwrap_or(DEFAULT_JUDGE_TIMEOUT_SECS),
                ),
            })
        }
        _ => {
            info!("AI judge not configured, using heuristic selection only");
            None
        }
    }
}
