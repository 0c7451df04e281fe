//! Candidate enrichment
//!
//! Joins raw search hits with per-id details and derives the textual signals.
//! Detail failures degrade individual candidates (duration 0, empty description);
//! they never abort enrichment.

use crate::matching::scorer::{has_penalty_keyword, is_topic_channel};
use crate::models::{watch_url, Candidate, MatchOptions, Track};
use crate::services::{SearchHit, VideoDetails, VideoSearch};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Enrich search hits into candidates, dropping hits without a video id
pub async fn enrich_candidates(
    search: &dyn VideoSearch,
    track: &Track,
    hits: Vec<SearchHit>,
    options: &MatchOptions,
) -> Vec<Candidate> {
    let hits: Vec<SearchHit> = hits.into_iter().filter(|h| !h.id.is_empty()).collect();
    if hits.is_empty() {
        return Vec::new();
    }

    let ids: Vec<String> = hits.iter().map(|h| h.id.clone()).collect();
    let details = fetch_details_degraded(search, &ids).await;
    let isrc = track.isrc().map(str::to_uppercase);

    hits.into_iter()
        .map(|hit| {
            let detail = details.get(&hit.id).cloned().unwrap_or_default();
            let isrc_in_description = isrc
                .as_deref()
                .is_some_and(|code| detail.description.to_uppercase().contains(code));

            Candidate {
                has_bad_words: has_penalty_keyword(&hit.title, &options.exclude_keywords),
                is_topic: is_topic_channel(&hit.channel),
                isrc_in_description,
                url: watch_url(&hit.id),
                duration_ms: detail.duration_ms,
                description: detail.description,
                id: hit.id,
                title: hit.title,
                channel: hit.channel,
            }
        })
        .collect()
}

/// One batched detail call; on failure, one call per id run concurrently
async fn fetch_details_degraded(
    search: &dyn VideoSearch,
    ids: &[String],
) -> HashMap<String, VideoDetails> {
    match search.fetch_details(ids).await {
        Ok(details) => return details,
        Err(e) => {
            warn!(ids = ids.len(), error = %e, "Batched detail fetch failed, retrying per id");
        }
    }

    let lookups = ids.iter().map(|id| async move {
        let single = std::slice::from_ref(id);
        match search.fetch_details(single).await {
            Ok(details) => details,
            Err(e) => {
                debug!(video_id = %id, error = %e, "Detail fetch failed, candidate degraded");
                HashMap::new()
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}
