//! Per-widget suggestion caching.
//!
//! Maps the exact query text a fetch was made for to the unfiltered result
//! the suggestion source returned. Lookups never fall back to a prefix match.
//!
//! Entries are neither evicted nor expired; a cache lives exactly as long as
//! the tag input that owns it.

use std::collections::HashMap;

use tracing::trace;

use crate::api::Tag;

/// Cache of suggestion results keyed by query text.
#[derive(Debug, Default, Clone)]
pub struct SuggestionCache {
    entries: HashMap<String, Vec<Tag>>,
}

impl SuggestionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached result for a query.
    ///
    /// The query is matched exactly, including case.
    pub fn get(&self, query: &str) -> Option<&[Tag]> {
        let hit = self.entries.get(query).map(Vec::as_slice);
        trace!(query, hit = hit.is_some(), "Suggestion cache lookup");
        hit
    }

    /// Check whether a query has a cached result.
    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Store the result for a query, replacing any previous entry.
    pub fn insert(&mut self, query: impl Into<String>, tags: Vec<Tag>) {
        self.entries.insert(query.into(), tags);
    }

    /// Get the number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
