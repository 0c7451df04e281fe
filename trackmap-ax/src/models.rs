//! Data carried through one extraction

use serde::{Deserialize, Serialize};

/// Basic video info reported by the media tool (no download)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub uploader: Option<String>,
    /// Title of the enclosing playlist, when the URL pointed at one
    pub playlist_title: Option<String>,
}

/// Artist/track split parsed from a video title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleGuess {
    pub artist: Option<String>,
    pub track: Option<String>,
}

/// Best recording found in the metadata registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryMatch {
    /// Credited artist names joined with ", "
    pub artist: Option<String>,
    pub title: Option<String>,
    /// Title of the chosen release
    pub album: Option<String>,
    /// Release date as reported ("YYYY", "YYYY-MM" or "YYYY-MM-DD")
    pub date: Option<String>,
    pub release_id: Option<String>,
    pub cover_url: Option<String>,
}

/// Final tag values written to the audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTags {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
    pub date: Option<String>,
    pub year: Option<String>,
}

/// Cover image bytes to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
}

/// One URL that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFailure {
    pub url: String,
    pub error: String,
}
