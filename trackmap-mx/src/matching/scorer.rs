//! Heuristic candidate scoring (lower is better)

use crate::models::{Candidate, MatchOptions};
use once_cell::sync::Lazy;
use regex::Regex;

/// Title markers for content that is not the plain studio recording
pub const BASE_PENALTY_KEYWORDS: &[&str] = &[
    "official music video",
    "music video",
    "mv",
    "m/v",
    "live",
    "lyric",
    "lyrics",
    "visualizer",
    "visualiser",
    "teaser",
    "trailer",
    "dance practice",
    "cover",
    "fanmade",
    "fan made",
    "reaction",
    "remix",
    "sped up",
    "slowed",
    "8d",
    "nightcore",
];

pub const OFFICIAL_AUDIO_REWARD: i32 = -10;
pub const TOPIC_CHANNEL_REWARD: i32 = -15;
pub const PENALTY_KEYWORD_COST: i32 = 100;

static STANDALONE_AUDIO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\baudio\b").expect("Invalid regex"));

/// Title says "official audio" or carries the standalone word "audio"
pub fn looks_like_official_audio(title: &str) -> bool {
    title.to_lowercase().contains("official audio") || STANDALONE_AUDIO.is_match(title)
}

/// Channel follows the auto-generated "Artist - Topic" convention
pub fn is_topic_channel(channel: &str) -> bool {
    channel.to_lowercase().ends_with("- topic")
}

/// Title contains a base or extra penalty keyword (case-insensitive substring)
pub fn has_penalty_keyword(title: &str, extra: &[String]) -> bool {
    let title = title.to_lowercase();
    BASE_PENALTY_KEYWORDS.iter().any(|keyword| title.contains(keyword))
        || extra
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .any(|keyword| !keyword.is_empty() && title.contains(&keyword))
}

/// Additive cost for one candidate
pub fn score_candidate(title: &str, channel: &str, options: &MatchOptions) -> i32 {
    let mut score = 0;
    if looks_like_official_audio(title) {
        score += OFFICIAL_AUDIO_REWARD;
    }
    if options.prefer_topic && is_topic_channel(channel) {
        score += TOPIC_CHANNEL_REWARD;
    }
    if has_penalty_keyword(title, &options.exclude_keywords) {
        score += PENALTY_KEYWORD_COST;
    }
    score
}

/// Score every candidate and sort ascending; ties keep search-result order
pub fn rank_candidates<'a>(
    candidates: &'a [Candidate],
    options: &MatchOptions,
) -> Vec<(&'a Candidate, i32)> {
    let mut ranked: Vec<(&Candidate, i32)> = candidates
        .iter()
        .map(|c| (c, score_candidate(&c.title, &c.channel, options)))
        .collect();
    // Vec::sort_by_key is stable
    ranked.sort_by_key(|(_, score)| *score);
    ranked
}
