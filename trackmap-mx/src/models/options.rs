//! Per-batch match options

use serde::{Deserialize, Serialize};

/// Lowest allowed per-batch concurrency
pub const MIN_CONCURRENCY: usize = 1;
/// Highest allowed per-batch concurrency
pub const MAX_CONCURRENCY: usize = 6;
/// Concurrency used when none is supplied
pub const DEFAULT_CONCURRENCY: usize = 3;
/// Duration tolerance used when none is supplied
pub const DEFAULT_TOLERANCE_MS: u64 = 6000;

/// Preferences supplied once per batch run
///
/// Deserializes from partial JSON (`{"toleranceMs": 4000}`); absent fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    /// Check candidate duration against the track duration
    pub verify_duration: bool,
    /// Allowed absolute duration difference in milliseconds
    pub tolerance_ms: u64,
    /// Tracks processed at once (clamped to 1..=6)
    pub concurrency: usize,
    /// Reward "Artist - Topic" channels
    pub prefer_topic: bool,
    /// Extra penalty keywords, merged with the built-in set
    pub exclude_keywords: Vec<String>,
    /// Re-sort result rows into input order after concurrent completion
    pub preserve_order: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            verify_duration: true,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            concurrency: DEFAULT_CONCURRENCY,
            prefer_topic: true,
            exclude_keywords: Vec::new(),
            preserve_order: true,
        }
    }
}

impl MatchOptions {
    /// Clamp concurrency and canonicalize keywords (trimmed, lowercase, non-empty)
    pub fn normalized(mut self) -> Self {
        self.concurrency = self.concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY);
        self.exclude_keywords = self
            .exclude_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }
}
