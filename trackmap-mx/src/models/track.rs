//! Source catalog track

use serde::{Deserialize, Serialize};

/// A song-length item from the source catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Artist names in credit order (may be empty)
    #[serde(default)]
    pub artists: Vec<String>,
    /// Album name and release date, when known
    #[serde(default)]
    pub album: Album,
    /// International Standard Recording Code
    #[serde(default)]
    pub isrc: Option<String>,
}

/// Album projection carried on a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: Option<String>,
    pub release_date: Option<String>,
}

impl Track {
    /// Artist names joined with `separator`
    pub fn joined_artists(&self, separator: &str) -> String {
        self.artists.join(separator)
    }

    /// Album name or empty string
    pub fn album_name(&self) -> &str {
        self.album.name.as_deref().unwrap_or("")
    }

    /// ISRC when present and non-blank
    pub fn isrc(&self) -> Option<&str> {
        self.isrc.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_track() {
        let track: Track =
            serde_json::from_str(r#"{"id":"t1","name":"Song","duration_ms":1000}"#).unwrap();
        assert!(track.artists.is_empty());
        assert_eq!(track.album, Album::default());
        assert!(track.isrc().is_none());
    }

    #[test]
    fn test_blank_isrc_is_absent() {
        let track = Track {
            id: "t1".into(),
            name: "Song".into(),
            duration_ms: 0,
            artists: vec![],
            album: Album::default(),
            isrc: Some("  ".into()),
        };
        assert!(track.isrc().is_none());
    }
}
