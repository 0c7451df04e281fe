//! Selection orchestrator behaviour against scripted collaborators

mod helpers;

use helpers::{details, hit, track, MockJudge, MockSearch};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use trackmap_mx::matching::enricher::enrich_candidates;
use trackmap_mx::matching::{EngineConfig, MatchError, QueryProfile, TrackMatcher};
use trackmap_mx::models::{DecisionSource, MatchOptions};
use trackmap_mx::services::{AiJudge, VideoSearch, Verdict};

fn matcher(search: MockSearch) -> TrackMatcher {
    TrackMatcher::new(Arc::new(search), None, EngineConfig::default())
}

fn matcher_with_judge(search: MockSearch, judge: Arc<MockJudge>) -> TrackMatcher {
    let judge: Arc<dyn AiJudge> = judge;
    TrackMatcher::new(Arc::new(search), Some(judge), EngineConfig::default())
}

/// Three candidates: penalized video, official audio (wrong length), topic upload
fn mixed_search() -> MockSearch {
    MockSearch::with_hits(vec![
        hit("mv", "Artist - Song (Official Music Video)", "ArtistVEVO"),
        hit("oa", "Artist - Song (Official Audio)", "Label"),
        hit("tp", "Song", "Artist - Topic"),
    ])
    .detail("mv", details(200_000, ""))
    .detail("oa", details(260_000, ""))
    .detail("tp", details(201_000, ""))
}

#[tokio::test]
async fn test_empty_search_yields_no_candidates_decision() {
    let m = matcher(MockSearch::default());

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::NoCandidates);
    assert!(decision.url.is_none());
    assert_eq!(decision.debug.queried, "Artist - Song");
    assert!(decision.debug.picked_title.is_none());
}

#[tokio::test]
async fn test_hits_without_ids_are_dropped() {
    let search = MockSearch::with_hits(vec![hit("", "Channel page", "Artist")]);
    let m = matcher(search);

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::NoCandidates);
}

#[tokio::test]
async fn test_heuristic_prefers_lowest_score() {
    let m = matcher(mixed_search());
    let opts = MatchOptions {
        verify_duration: false,
        ..Default::default()
    };

    let decision = m.pick_best(&track("t1", "Song", 200_000), &opts).await.unwrap();

    assert_eq!(decision.source, DecisionSource::Heuristic);
    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=tp"));
    assert_eq!(decision.debug.picked_score, Some(-15));
    assert_eq!(decision.debug.picked_channel.as_deref(), Some("Artist - Topic"));
    assert_eq!(decision.debug.duration_match, None);
}

#[tokio::test]
async fn test_duration_promotion_picks_next_fitting_candidate() {
    // Without topic preference the official audio upload ranks first but is 60s too long
    let m = matcher(mixed_search());
    let opts = MatchOptions {
        prefer_topic: false,
        ..Default::default()
    };

    let decision = m.pick_best(&track("t1", "Song", 200_000), &opts).await.unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=tp"));
    assert_eq!(decision.debug.duration_match, Some(true));
    assert_eq!(decision.debug.picked_score, Some(0));
}

#[tokio::test]
async fn test_promotion_scans_in_score_order() {
    // Ranked: a(-10, too long), b(0, fits), c(100, fits) -> b
    let search = MockSearch::with_hits(vec![
        hit("c", "Song (Live)", "X"),
        hit("b", "Song", "X"),
        hit("a", "Song (Official Audio)", "X"),
    ])
    .detail("a", details(300_000, ""))
    .detail("b", details(203_000, ""))
    .detail("c", details(200_000, ""));

    let decision = matcher(search)
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=b"));
    assert_eq!(decision.debug.duration_match, Some(true));
}

#[tokio::test]
async fn test_no_fitting_candidate_keeps_best_scored() {
    let search = MockSearch::with_hits(vec![
        hit("a", "Song (Official Audio)", "X"),
        hit("b", "Song", "X"),
    ])
    .detail("a", details(100_000, ""))
    .detail("b", details(300_000, ""));

    let decision = matcher(search)
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=a"));
    assert_eq!(decision.debug.duration_match, Some(false));
    assert_eq!(decision.debug.picked_score, Some(-10));
}

#[tokio::test]
async fn test_duration_boundary_is_inclusive() {
    let search = |ms| {
        MockSearch::with_hits(vec![hit("a", "Song (Official Audio)", "X")]).detail("a", details(ms, ""))
    };
    let opts = MatchOptions::default();
    let t = track("t1", "Song", 200_000);

    let inside = matcher(search(206_000)).pick_best(&t, &opts).await.unwrap();
    assert_eq!(inside.debug.duration_match, Some(true));

    let outside = matcher(search(206_001)).pick_best(&t, &opts).await.unwrap();
    assert_eq!(outside.debug.duration_match, Some(false));
}

#[tokio::test]
async fn test_extra_keywords_penalize() {
    let search = MockSearch::with_hits(vec![
        hit("k", "Song (Karaoke Version)", "X"),
        hit("p", "Song", "X"),
    ]);
    let opts = MatchOptions {
        verify_duration: false,
        exclude_keywords: vec!["  KARAOKE ".to_string()],
        ..Default::default()
    }
    .normalized();

    let decision = matcher(search)
        .pick_best(&track("t1", "Song", 200_000), &opts)
        .await
        .unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=p"));
}

#[tokio::test]
async fn test_extra_keywords_penalize_without_normalizing() {
    let search = MockSearch::with_hits(vec![
        hit("k", "Song (Karaoke Version)", "X"),
        hit("p", "Song", "X"),
    ]);
    let opts = MatchOptions {
        verify_duration: false,
        exclude_keywords: vec!["KARAOKE".to_string()],
        ..Default::default()
    };

    let decision = matcher(search)
        .pick_best(&track("t1", "Song", 200_000), &opts)
        .await
        .unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=p"));
    assert_eq!(decision.debug.picked_score, Some(0));
}

#[tokio::test]
async fn test_ai_pick_without_duration_verification() {
    let judge = Arc::new(MockJudge::picking("oa", "official audio"));
    let m = matcher_with_judge(mixed_search(), judge);
    let opts = MatchOptions {
        verify_duration: false,
        ..Default::default()
    };

    let decision = m.pick_best(&track("t1", "Song", 200_000), &opts).await.unwrap();

    assert_eq!(decision.source, DecisionSource::Ai);
    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=oa"));
    assert_eq!(decision.debug.duration_match, None);
    assert_eq!(decision.debug.picked_score, None);
    assert!(decision.debug.queried.ends_with(" [AI]"));
}

#[tokio::test]
async fn test_ai_override_selects_penalized_candidate() {
    let judge = Arc::new(MockJudge::picking("mv", "closest title"));
    let m = matcher_with_judge(mixed_search(), judge.clone());

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::Ai);
    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=mv"));
    assert_eq!(decision.debug.picked_score, None);
    assert_eq!(decision.debug.duration_match, Some(true));
    assert_eq!(decision.debug.queried, "Artist - Song [AI]");
    assert_eq!(decision.debug.ai_reason.as_deref(), Some("closest title"));
    assert_eq!(judge.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*judge.seen_candidates.lock().unwrap(), vec!["mv", "oa", "tp"]);
}

#[tokio::test]
async fn test_ai_pick_is_final_even_when_duration_fails() {
    let judge = Arc::new(MockJudge::picking("oa", "official audio"));
    let m = matcher_with_judge(mixed_search(), judge);

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=oa"));
    assert_eq!(decision.debug.duration_match, Some(false));
}

#[tokio::test]
async fn test_ai_unknown_id_falls_back_to_heuristic() {
    let judge = Arc::new(MockJudge::picking("not-a-candidate", "hallucinated"));
    let m = matcher_with_judge(mixed_search(), judge);

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::Heuristic);
    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=tp"));
    assert_eq!(decision.debug.queried, "Artist - Song");
    assert!(decision.debug.ai_reason.is_none());
}

#[tokio::test]
async fn test_ai_no_opinion_falls_back_to_heuristic() {
    let judge = Arc::new(MockJudge::returning(Verdict::no_opinion()));
    let m = matcher_with_judge(mixed_search(), judge);

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::Heuristic);
    assert!(decision.url.is_some());
}

#[tokio::test]
async fn test_ai_timeout_falls_back_to_heuristic() {
    let judge: Arc<dyn AiJudge> =
        Arc::new(MockJudge::picking("mv", "slow").delayed(Duration::from_millis(500)));
    let config = EngineConfig {
        judge_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let m = TrackMatcher::new(Arc::new(mixed_search()), Some(judge), config);

    let decision = m
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await
        .unwrap();

    assert_eq!(decision.source, DecisionSource::Heuristic);
    assert_eq!(decision.url.as_deref(), Some("https://www.youtube.com/watch?v=tp"));
}

#[tokio::test]
async fn test_search_failure_is_an_error() {
    let mut search = MockSearch::default();
    search.failing_queries.insert("Artist - Song".to_string());

    let result = matcher(search)
        .pick_best(&track("t1", "Song", 200_000), &MatchOptions::default())
        .await;

    assert!(matches!(result, Err(MatchError::Search(_))));
}

#[tokio::test]
async fn test_pool_size_is_clamped_and_forwarded() {
    for (configured, expected) in [(0, 1), (6, 6), (500, 50)] {
        let search = Arc::new(MockSearch::default());
        let config = EngineConfig {
            pool_size: configured,
            ..Default::default()
        };
        let m = TrackMatcher::new(search.clone() as Arc<dyn VideoSearch>, None, config);

        m.pick_best(&track("t1", "Song", 1), &MatchOptions::default())
            .await
            .unwrap();

        assert_eq!(*search.last_limit.lock().unwrap(), Some(expected));
    }
}

#[tokio::test]
async fn test_extended_query_profile() {
    let config = EngineConfig {
        query_profile: QueryProfile::Extended,
        ..Default::default()
    };
    let m = TrackMatcher::new(Arc::new(MockSearch::default()), None, config);
    let mut t = track("t1", "Song", 1);
    t.album.name = Some("Record".to_string());

    let decision = m.pick_best(&t, &MatchOptions::default()).await.unwrap();

    assert_eq!(decision.debug.queried, "Artist - Song official audio Record");
}

#[tokio::test]
async fn test_enrichment_degrades_single_failing_id() {
    let mut search = MockSearch::with_hits(vec![]).detail("a", details(180_000, "desc a"));
    search = search.detail("b", details(190_000, "desc b"));
    search.fail_batched_details = true;
    search.failing_detail_ids = HashSet::from(["b".to_string()]);

    let hits = vec![hit("a", "A", "X"), hit("b", "B", "X"), hit("c", "C", "X")];
    let candidates = enrich_candidates(
        &search,
        &track("t1", "Song", 1),
        hits,
        &MatchOptions::default(),
    )
    .await;

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].duration_ms, 180_000);
    assert_eq!(candidates[0].description, "desc a");
    assert_eq!(candidates[1].duration_ms, 0);
    assert_eq!(candidates[1].description, "");
    assert_eq!(candidates[2].duration_ms, 0);
    // one batched call plus one call per id
    assert_eq!(search.detail_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_enrichment_derives_signals() {
    let search = MockSearch::default().detail("a", details(1, "ISRC: usabc1234567"));
    let mut t = track("t1", "Song", 1);
    t.isrc = Some("USABC1234567".to_string());

    let candidates = enrich_candidates(
        &search,
        &t,
        vec![hit("a", "Song (Lyric Video)", "Artist - Topic")],
        &MatchOptions::default(),
    )
    .await;

    let c = &candidates[0];
    assert!(c.has_bad_words);
    assert!(c.is_topic);
    assert!(c.isrc_in_description);
    assert_eq!(c.url, "https://www.youtube.com/watch?v=a");
}
