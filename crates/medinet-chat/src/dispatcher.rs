//! Cached search dispatch and the results panel it drives.
//!
//! Each call either answers from the [`ResultCache`] or issues exactly one
//! request through the injected [`SearchClient`]. Overlapping searches are not
//! coalesced. Every call takes a sequence number and only the newest one may
//! repaint the panel, so a slow response to an abandoned query cannot replace
//! the results of a later search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use medinet_core::config::SearchConfig;
use medinet_core::types::{rank_results, SearchFilters, SearchResult, SearchType};

use crate::cache::{CacheKey, ResultCache};
use crate::client::{RequestFilters, SearchClient, SearchRequest};
use crate::error::ChatError;

/// What the results sidebar currently shows.
#[derive(Debug, Clone)]
pub struct ResultsPanel {
    pub search_type: SearchType,
    pub results: Arc<[SearchResult]>,
    /// Error banner from the most recent failed search.
    pub error: Option<String>,
    /// True while at least one search request is in flight.
    pub searching: bool,
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self {
            search_type: SearchType::Hospital,
            results: Arc::from(Vec::new()),
            error: None,
            searching: false,
        }
    }
}

#[derive(Debug, Default)]
struct PanelState {
    panel: ResultsPanel,
    latest_seq: u64,
    in_flight: usize,
}

/// Vector search with a session cache in front of it.
pub struct SearchDispatcher {
    client: Arc<dyn SearchClient>,
    cache: ResultCache,
    threshold: f64,
    limit: u32,
    next_seq: AtomicU64,
    state: Mutex<PanelState>,
}

impl SearchDispatcher {
    pub fn new(client: Arc<dyn SearchClient>, config: &SearchConfig) -> Self {
        Self {
            client,
            cache: ResultCache::new(),
            threshold: config.threshold,
            limit: config.limit,
            next_seq: AtomicU64::new(0),
            state: Mutex::new(PanelState::default()),
        }
    }

    /// Search `query` against `search_type`, ranked by similarity then rating.
    ///
    /// Cache hits return without I/O. A failed request leaves the cache
    /// untouched so an identical call retries.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        filters: Option<&SearchFilters>,
    ) -> Result<Arc<[SearchResult]>, ChatError> {
        if query.trim().is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let key = CacheKey::new(search_type, query, filters);

        if let Some(hit) = self.cache.get(&key) {
            debug!(key = key.as_str(), results = hit.len(), "Search cache hit");
            let mut state = self.lock_state();
            state.latest_seq = seq;
            state.panel.search_type = search_type;
            state.panel.results = Arc::clone(&hit);
            state.panel.error = None;
            return Ok(hit);
        }

        {
            let mut state = self.lock_state();
            state.latest_seq = seq;
            state.in_flight += 1;
            state.panel.searching = true;
            state.panel.error = None;
        }
        let _in_flight = InFlight { state: &self.state };

        let request = SearchRequest {
            query: query.to_string(),
            search_type,
            filters: RequestFilters {
                filters: filters.cloned().unwrap_or_default(),
                threshold: self.threshold,
                limit: self.limit,
            },
        };

        match self.client.search(&request).await {
            Ok(mut results) => {
                rank_results(&mut results);
                let stored = self.cache.insert(key, results);
                info!(query, %search_type, results = stored.len(), "Search completed");

                let mut state = self.lock_state();
                if state.latest_seq == seq {
                    state.panel.search_type = search_type;
                    state.panel.results = Arc::clone(&stored);
                } else {
                    debug!(seq, latest = state.latest_seq, "Stale search response not displayed");
                }
                Ok(stored)
            }
            Err(e) => {
                warn!(query, %search_type, error = %e, "Search failed");
                let mut state = self.lock_state();
                if state.latest_seq == seq {
                    state.panel.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Snapshot of the results panel.
    pub fn panel(&self) -> ResultsPanel {
        self.lock_state().panel.clone()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    fn lock_state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the searching flag on every exit path, including cancellation.
struct InFlight<'a> {
    state: &'a Mutex<PanelState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
        state.panel.searching = state.in_flight > 0;
    }
}
