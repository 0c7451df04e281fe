//! Scripted collaborator mocks

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use trackmap_mx::models::{Candidate, Track};
use trackmap_mx::services::{
    AiJudge, CatalogAccess, CatalogError, CatalogSelector, CatalogSource, SearchError, SearchHit,
    VideoDetails, VideoSearch, Verdict,
};

/// Scripted video search
///
/// Hits are looked up by exact query, falling back to `default_hits`.
#[derive(Default)]
pub struct MockSearch {
    pub default_hits: Vec<SearchHit>,
    pub hits_by_query: HashMap<String, Vec<SearchHit>>,
    pub details: HashMap<String, VideoDetails>,
    /// Queries whose search call fails
    pub failing_queries: HashSet<String>,
    /// Fail every multi-id detail request
    pub fail_batched_details: bool,
    /// Ids whose single-id detail request fails
    pub failing_detail_ids: HashSet<String>,
    /// Artificial latency per query
    pub delays: HashMap<String, Duration>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub last_limit: Mutex<Option<usize>>,
}

impl MockSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            default_hits: hits,
            ..Default::default()
        }
    }

    pub fn detail(mut self, id: &str, details: VideoDetails) -> Self {
        self.details.insert(id.to_string(), details);
        self
    }
}

#[async_trait]
impl VideoSearch for MockSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock().unwrap() = Some(limit);

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_queries.contains(query) {
            return Err(SearchError::Network(format!("search unavailable for '{}'", query)));
        }

        let hits = self
            .hits_by_query
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default_hits.clone());
        Ok(hits.into_iter().take(limit).collect())
    }

    async fn fetch_details(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, VideoDetails>, SearchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        if ids.len() > 1 && self.fail_batched_details {
            return Err(SearchError::Api(500, "batch failed".to_string()));
        }
        if ids.iter().any(|id| self.failing_detail_ids.contains(id)) {
            return Err(SearchError::Network("detail unavailable".to_string()));
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.details.get(id).map(|d| (id.clone(), d.clone())))
            .collect())
    }
}

/// Judge returning a fixed verdict, optionally after a delay
pub struct MockJudge {
    pub verdict: Verdict,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub seen_candidates: Mutex<Vec<String>>,
}

impl MockJudge {
    pub fn picking(id: &str, reason: &str) -> Self {
        Self::returning(Verdict {
            best_id: Some(id.to_string()),
            confidence: Some(0.9),
            reason: Some(reason.to_string()),
        })
    }

    pub fn returning(verdict: Verdict) -> Self {
        Self {
            verdict,
            delay: None,
            calls: AtomicUsize::new(0),
            seen_candidates: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl AiJudge for MockJudge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn judge(&self, _track: &Track, candidates: &[Candidate]) -> Verdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_candidates.lock().unwrap() = candidates.iter().map(|c| c.id.clone()).collect();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.verdict.clone()
    }
}

/// Catalog returning fixed tracks, or failing
#[derive(Default)]
pub struct MockCatalog {
    pub tracks: Vec<Track>,
    pub fail: bool,
    pub last_selector: Mutex<Option<CatalogSelector>>,
}

impl MockCatalog {
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn fetch_tracks(
        &self,
        selector: &CatalogSelector,
        _access: &CatalogAccess,
    ) -> Result<Vec<Track>, CatalogError> {
        *self.last_selector.lock().unwrap() = Some(selector.clone());
        if self.fail {
            return Err(CatalogError::Api(503, "catalog down".to_string()));
        }
        Ok(self.tracks.clone())
    }
}
