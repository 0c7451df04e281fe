//! Per-track selection orchestrator
//!
//! Phases: QueryBuilt → CandidatesFetched → Enriched → (AiAttempted) → Decided.
//!
//! Search failure is the only error that leaves this module; detail fetch and AI
//! judge failures degrade to heuristic selection.

use crate::matching::duration::within_tolerance;
use crate::matching::enricher::enrich_candidates;
use crate::matching::query::{build_query, QueryProfile};
use crate::matching::scorer::rank_candidates;
use crate::models::{Candidate, Decision, DecisionSource, MatchDebug, MatchOptions, Track};
use crate::services::{AiJudge, SearchError, VideoSearch, Verdict};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of search results considered per track
pub const DEFAULT_POOL_SIZE: usize = 12;
/// Platform cap on search results per request
pub const MAX_POOL_SIZE: usize = 50;
/// Default upper bound on one AI judge call
pub const DEFAULT_JUDGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Suffix added to the recorded query when the AI judge decided
const AI_QUERY_TAG: &str = " [AI]";

/// Per-track matching failure
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Video search failed: {0}")]
    Search(#[from] SearchError),
}

/// Engine-level settings (fixed for the process, unlike per-batch [`MatchOptions`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Search results requested per track (clamped to 1..=50)
    pub pool_size: usize,
    pub query_profile: QueryProfile,
    pub judge_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            query_profile: QueryProfile::Basic,
            judge_timeout: DEFAULT_JUDGE_TIMEOUT,
        }
    }
}

/// Orchestrator phase for one track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    QueryBuilt,
    CandidatesFetched,
    Enriched,
    AiAttempted,
    Decided,
}

/// Forward-only phase tracker, logged per track
struct PhaseTracker<'a> {
    track_id: &'a str,
    phase: MatchPhase,
}

impl<'a> PhaseTracker<'a> {
    fn start(track_id: &'a str) -> Self {
        debug!(track_id, phase = ?MatchPhase::QueryBuilt, "Match phase");
        Self {
            track_id,
            phase: MatchPhase::QueryBuilt,
        }
    }

    fn transition_to(&mut self, next: MatchPhase) {
        debug_assert!(next > self.phase, "match phases only move forward");
        debug!(track_id = self.track_id, from = ?self.phase, to = ?next, "Match phase");
        self.phase = next;
    }
}

/// Selection orchestrator: search, enrich, optionally ask the AI judge, decide
pub struct TrackMatcher {
    search: Arc<dyn VideoSearch>,
    judge: Option<Arc<dyn AiJudge>>,
    config: EngineConfig,
}

impl TrackMatcher {
    pub fn new(
        search: Arc<dyn VideoSearch>,
        judge: Option<Arc<dyn AiJudge>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            search,
            judge,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    /// Choose the best video for one track
    pub async fn pick_best(
        &self,
        track: &Track,
        options: &MatchOptions,
    ) -> Result<Decision, MatchError> {
        let query = build_query(track, self.config.query_profile);
        let mut phase = PhaseTracker::start(&track.id);

        let pool_size = self.config.pool_size.clamp(1, MAX_POOL_SIZE);
        let hits = self.search.search(&query, pool_size).await?;
        phase.transition_to(MatchPhase::CandidatesFetched);

        let candidates = enrich_candidates(self.search.as_ref(), track, hits, options).await;
        phase.transition_to(MatchPhase::Enriched);

        if candidates.is_empty() {
            debug!(track_id = %track.id, query = %query, "No candidates");
            phase.transition_to(MatchPhase::Decided);
            return Ok(Decision::no_candidates(query));
        }

        if let Some(judge) = &self.judge {
            let verdict = self.consult_judge(judge.as_ref(), track, &candidates).await;
            phase.transition_to(MatchPhase::AiAttempted);

            if let Some(decision) = ai_decision(track, &candidates, verdict, options, &query) {
                phase.transition_to(MatchPhase::Decided);
                return Ok(decision);
            }
        }

        let decision = heuristic_decision(track, &candidates, options, query);
        phase.transition_to(MatchPhase::Decided);
        Ok(decision)
    }

    async fn consult_judge(
        &self,
        judge: &dyn AiJudge,
        track: &Track,
        candidates: &[Candidate],
    ) -> Verdict {
        match tokio::time::timeout(self.config.judge_timeout, judge.judge(track, candidates)).await
        {
            Ok(verdict) => verdict,
            Err(_) => {
                warn!(
                    judge = judge.name(),
                    track_id = %track.id,
                    timeout_secs = self.config.judge_timeout.as_secs(),
                    "AI judge timed out, no opinion"
                );
                Verdict::no_opinion()
            }
        }
    }
}

/// Decision from an AI verdict, if the verdict names a known candidate
fn ai_decision(
    track: &Track,
    candidates: &[Candidate],
    verdict: Verdict,
    options: &MatchOptions,
    query: &str,
) -> Option<Decision> {
    let best_id = verdict.best_id?;
    let Some(chosen) = candidates.iter().find(|c| c.id == best_id) else {
        debug!(track_id = %track.id, best_id = %best_id, "AI picked an unknown id, using heuristic");
        return None;
    };

    let duration_match = options
        .verify_duration
        .then(|| within_tolerance(chosen.duration_ms, track.duration_ms, options.tolerance_ms));

    Some(Decision {
        url: Some(chosen.url.clone()),
        source: DecisionSource::Ai,
        debug: MatchDebug {
            picked_title: Some(chosen.title.clone()),
            picked_channel: Some(chosen.channel.clone()),
            picked_score: None,
            duration_match,
            queried: format!("{}{}", query, AI_QUERY_TAG),
            ai_reason: verdict.reason,
        },
    })
}

/// Lowest-scored candidate, promoted to the first duration-verified one if needed
///
/// `candidates` must be non-empty.
fn heuristic_decision(
    track: &Track,
    candidates: &[Candidate],
    options: &MatchOptions,
    query: String,
) -> Decision {
    let ranked = rank_candidates(candidates, options);
    let Some(&(top, top_score)) = ranked.first() else {
        return Decision::no_candidates(query);
    };

    let fits =
        |c: &Candidate| within_tolerance(c.duration_ms, track.duration_ms, options.tolerance_ms);

    let (chosen, score, duration_match) = if !options.verify_duration {
        (top, top_score, None)
    } else if fits(top) {
        (top, top_score, Some(true))
    } else {
        match ranked.iter().skip(1).find(|&&(c, _)| fits(c)) {
            Some(&(promoted, promoted_score)) => {
                debug!(
                    track_id = %track.id,
                    from = %top.id,
                    to = %promoted.id,
                    "Promoted candidate on duration"
                );
                (promoted, promoted_score, Some(true))
            }
            None => (top, top_score, Some(false)),
        }
    };

    Decision {
        url: Some(chosen.url.clone()),
        source: DecisionSource::Heuristic,
        debug: MatchDebug {
            picked_title: Some(chosen.title.clone()),
            picked_channel: Some(chosen.channel.clone()),
            picked_score: Some(score),
            duration_match,
            queried: query,
            ai_reason: None,
        },
    }
}
