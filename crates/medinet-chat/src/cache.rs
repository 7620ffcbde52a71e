//! Session-scoped result cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use medinet_core::types::{SearchFilters, SearchResult, SearchType};

/// Composite key `type:query:filtersJSON`.
///
/// A pure function of its inputs: equal (type, query, filters) always produce
/// the same key, and absent filters key the same as empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(search_type: SearchType, query: &str, filters: Option<&SearchFilters>) -> Self {
        let filters_json = filters
            .map(SearchFilters::canonical_json)
            .unwrap_or_else(|| "{}".to_string());
        CacheKey(format!("{}:{}:{}", search_type, query, filters_json))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ranked result sequences keyed by [`CacheKey`].
///
/// Entries are written once and never replaced or evicted; the cache lives
/// exactly as long as its owner.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, Arc<[SearchResult]>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<[SearchResult]>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store `results` under `key` unless an entry already exists, and return
    /// whichever sequence is now cached.
    pub fn insert(&self, key: CacheKey, results: Vec<SearchResult>) -> Arc<[SearchResult]> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert_with(|| results.into()))
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
