//! Per-track decision and the flattened output row

use super::Track;
use serde::{Deserialize, Serialize};
use trackmap_common::human_time::format_track_duration;

/// Which path produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// Search returned nothing usable
    NoCandidates,
    /// AI judge picked a known candidate
    Ai,
    /// Heuristic ranking (with optional duration promotion)
    Heuristic,
}

/// Explainability fields attached to a decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDebug {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_channel: Option<String>,
    /// Heuristic score; absent when the AI judge decided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_score: Option<i32>,
    /// Absent when duration verification is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_match: Option<bool>,
    /// Query sent to video search; suffixed with ` [AI]` on the AI path
    pub queried: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
}

/// Final per-track output of the selection orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Watch URL of the chosen candidate
    pub url: Option<String>,
    pub source: DecisionSource,
    pub debug: MatchDebug,
}

impl Decision {
    /// Decision for an empty candidate pool
    pub fn no_candidates(query: String) -> Self {
        Self {
            url: None,
            source: DecisionSource::NoCandidates,
            debug: MatchDebug {
                queried: query,
                ..Default::default()
            },
        }
    }
}

/// One row of the mapping output (Track projection + Decision)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub spotify_track: String,
    /// Artist names joined with ", "
    pub artists: String,
    /// `M:SS`
    pub duration: String,
    pub album: String,
    pub isrc: Option<String>,
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_debug: Option<MatchDebug>,
    /// Set when the whole per-track operation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRow {
    fn projection(track: &Track) -> Self {
        Self {
            spotify_track: track.name.clone(),
            artists: track.joined_artists(", "),
            duration: format_track_duration(track.duration_ms),
            album: track.album_name().to_string(),
            isrc: track.isrc.clone(),
            youtube_url: None,
            match_debug: None,
            error: None,
        }
    }

    pub fn from_decision(track: &Track, decision: Decision) -> Self {
        Self {
            youtube_url: decision.url,
            match_debug: Some(decision.debug),
            ..Self::projection(track)
        }
    }

    pub fn from_error(track: &Track, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::projection(track)
        }
    }
}
