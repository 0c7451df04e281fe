//! Batch pipeline driver

use crate::matching::TrackMatcher;
use crate::models::{MatchOptions, ResultRow, Track};
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Match every track, at most `options.concurrency` at a time
///
/// Output length always equals input length. With `preserve_order` rows come back in
/// input order; otherwise they come back in completion order.
pub async fn run_batch(
    matcher: &TrackMatcher,
    tracks: Vec<Track>,
    options: &MatchOptions,
) -> Vec<ResultRow> {
    let options = options.clone().normalized();
    let run_id = Uuid::new_v4();
    let total_tracks = tracks.len();
    let tracks_processed = AtomicUsize::new(0);

    tracing::info!(
        run_id = %run_id,
        tracks = total_tracks,
        concurrency = options.concurrency,
        verify_duration = options.verify_duration,
        ai_judge = matcher.has_judge(),
        "Starting match batch"
    );

    let options_ref = &options;
    let processed_ref = &tracks_processed;
    let mut rows: Vec<(usize, ResultRow)> = stream::iter(tracks.into_iter().enumerate())
        .map(|(index, track)| async move {
            let row = match matcher.pick_best(&track, options_ref).await {
                Ok(decision) => {
                    tracing::debug!(
                        run_id = %run_id,
                        track = %track.name,
                        source = ?decision.source,
                        url = ?decision.url,
                        "Track matched"
                    );
                    ResultRow::from_decision(&track, decision)
                }
                Err(e) => {
                    // Per-track error isolation: siblings continue
                    tracing::error!(
                        run_id = %run_id,
                        track = %track.name,
                        error = %e,
                        "Track matching failed"
                    );
                    ResultRow::from_error(&track, e.to_string())
                }
            };

            let current = processed_ref.fetch_add(1, Ordering::Relaxed) + 1;
            if current % 10 == 0 || current == total_tracks {
                tracing::info!(
                    run_id = %run_id,
                    progress = format!("{}/{}", current, total_tracks),
                    "Batch progress update"
                );
            }

            (index, row)
        })
        .buffer_unordered(options.concurrency)
        .collect()
        .await;

    if options.preserve_order {
        rows.sort_by_key(|(index, _)| *index);
    }

    let failed = rows.iter().filter(|(_, row)| row.error.is_some()).count();
    let unmatched = rows
        .iter()
        .filter(|(_, row)| row.error.is_none() && row.youtube_url.is_none())
        .count();
    tracing::info!(
        run_id = %run_id,
        total = total_tracks,
        failed,
        unmatched,
        "Match batch completed"
    );

    rows.into_iter().map(|(_, row)| row).collect()
}
