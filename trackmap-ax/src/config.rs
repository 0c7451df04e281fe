//! Configuration resolution for trackmap-ax

use std::path::PathBuf;
use trackmap_common::config::{default_output_dir, get_user_agent, resolve_setting, TomlConfig};

const DEFAULT_YTDLP_BINARY: &str = "yt-dlp";

/// Resolved extraction settings
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    /// Where tagged audio files are written
    pub output_dir: PathBuf,
    pub ytdlp_binary: String,
    /// User-Agent for metadata registry requests
    pub user_agent: String,
    /// Registry lookup enabled
    pub musicbrainz: bool,
}

impl ExtractSettings {
    /// Resolve from ENV and TOML; `output_override` (CLI) wins for the output dir
    pub fn resolve(toml_config: &TomlConfig, output_override: Option<PathBuf>) -> Self {
        let output_dir = output_override
            .or_else(|| toml_config.output_dir.clone())
            .unwrap_or_else(|| default_output_dir().join("audio"));

        let ytdlp_binary = resolve_setting(
            "yt-dlp path",
            &["TRACKMAP_YTDLP"],
            toml_config.extract.ytdlp_path.as_deref(),
        )
        .unwrap_or_else(|| DEFAULT_YTDLP_BINARY.to_string());

        let contact = resolve_setting(
            "Contact",
            &["TRACKMAP_CONTACT"],
            toml_config.contact.as_deref(),
        );

        Self {
            output_dir,
            ytdlp_binary,
            user_agent: get_user_agent(contact.as_deref()),
            musicbrainz: toml_config.extract.musicbrainz,
        }
    }
}
