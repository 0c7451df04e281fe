//! AI judge contract, prompt construction and verdict parsing
//!
//! The judge is advisory. Whatever happens on the wire, callers receive a
//! [`Verdict`]; "no opinion" is `best_id: None`.

use crate::models::{Candidate, Track};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Instruction preamble sent ahead of the structured request
pub const SYSTEM_PROMPT: &str = "You are selecting the best YouTube video that matches a Spotify track's OFFICIAL AUDIO (not music video, not live, not lyrics).\n\
Return STRICT JSON: {\"bestId\": \"<videoId or null>\", \"confidence\": <0..1>, \"reason\": \"<short>\"} and NOTHING else.";

/// Internal judge failures; mapped to "no opinion" before leaving the judge
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Endpoint returned status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// AI verdict
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verdict {
    pub best_id: Option<String>,
    pub confidence: Option<f64>,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn no_opinion() -> Self {
        Self::default()
    }
}

/// External reasoning service that picks one candidate
#[async_trait]
pub trait AiJudge: Send + Sync {
    /// Judge name for logs
    fn name(&self) -> &'static str;

    /// One best-effort attempt; never fails
    async fn judge(&self, track: &Track, candidates: &[Candidate]) -> Verdict;
}

#[derive(Serialize)]
struct PromptTrack<'a> {
    title: &'a str,
    artists: &'a [String],
    album: &'a str,
    duration_ms: u64,
    isrc: Option<&'a str>,
}

#[derive(Serialize)]
struct PromptInstructions {
    must_match_title: bool,
    must_prefer_official_audio: bool,
    avoid_music_video_live_lyrics: bool,
    prefer_topic_channel_if_right: bool,
    consider_duration_proximity_ms: bool,
    consider_isrc_in_description: bool,
}

#[derive(Serialize)]
struct PromptPayload<'a> {
    track: PromptTrack<'a>,
    instructions: PromptInstructions,
    candidates: &'a [Candidate],
}

/// Build the full prompt for a track and its enriched candidates
pub fn build_prompt(track: &Track, candidates: &[Candidate]) -> String {
    let payload = PromptPayload {
        track: PromptTrack {
            title: &track.name,
            artists: &track.artists,
            album: track.album_name(),
            duration_ms: track.duration_ms,
            isrc: track.isrc(),
        },
        instructions: PromptInstructions {
            must_match_title: true,
            must_prefer_official_audio: true,
            avoid_music_video_live_lyrics: true,
            prefer_topic_channel_if_right: true,
            consider_duration_proximity_ms: true,
            consider_isrc_in_description: true,
        },
        candidates,
    };

    // Serializing borrowed strings and plain structs cannot fail
    let body = serde_json::to_string_pretty(&payload).unwrap_or_default();
    format!("{}\n\nUser:\n{}\n\nReturn strict JSON only.", SYSTEM_PROMPT, body)
}

/// Parse model output into a verdict
///
/// Tries the whole text as JSON first, then the first balanced `{...}` span.
/// Anything else is "no opinion".
pub fn parse_verdict(text: &str) -> Verdict {
    let text = text.trim();

    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => Some(value),
        Err(_) => first_balanced_object(text).and_then(|span| serde_json::from_str(span).ok()),
    };

    parsed
        .as_ref()
        .and_then(verdict_from_value)
        .unwrap_or_else(Verdict::no_opinion)
}

fn verdict_from_value(value: &Value) -> Option<Verdict> {
    let object = value.as_object()?;
    Some(Verdict {
        best_id: object
            .get("bestId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|id| !id.is_empty()),
        confidence: object.get("confidence").and_then(Value::as_f64),
        reason: object.get("reason").and_then(Value::as_str).map(str::to_string),
    })
}

/// First `{...}` span with balanced braces, ignoring braces inside JSON strings
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
