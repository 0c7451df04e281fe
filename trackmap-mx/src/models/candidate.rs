//! Enriched video candidate

use serde::Serialize;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// A video search result with derived signals
///
/// Serialized form is what the AI judge sees; the description is kept out of the
/// prompt and only contributes through `isrc_in_description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Platform video id (never empty)
    pub id: String,
    pub title: String,
    /// Channel / uploader name
    pub channel: String,
    /// Duration in milliseconds, 0 when unknown
    pub duration_ms: u64,
    /// Description text, empty when unknown
    #[serde(skip_serializing)]
    pub description: String,
    /// Title contains a penalty keyword
    pub has_bad_words: bool,
    /// Channel follows the "Artist - Topic" convention
    pub is_topic: bool,
    /// Description contains the track's ISRC
    pub isrc_in_description: bool,
    pub url: String,
}
