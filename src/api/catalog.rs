//! In-memory tag catalog.
//!
//! A fixed list of product categories searched by case-insensitive substring
//! match, with an artificial delay to stand in for a remote lookup.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::error::Result;
use super::source::SuggestionSource;
use super::types::Tag;

/// Default number of candidates returned per query.
pub const DEFAULT_MAX_RESULTS: usize = 7;

/// Default artificial lookup delay in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 300;

const CATEGORY_NAMES: &[&str] = &[
    "Electronics",
    "Home Goods",
    "Apparel",
    "Books",
    "Sports & Outdoors",
    "Health & Beauty",
    "Automotive",
    "Toys & Games",
    "Pet Supplies",
    "Jewelry",
    "Computers & Accessories",
    "Smart Home Devices",
    "Gaming Consoles",
    "Kitchen Appliances",
    "Fitness Equipment",
    "Gardening Tools",
    "Baby Products",
    "Musical Instruments",
    "Office Supplies",
    "Food & Groceries",
];

/// A suggestion source backed by a fixed list of tags.
#[derive(Debug, Clone)]
pub struct TagCatalog {
    /// All known tags.
    tags: Vec<Tag>,
    /// Maximum number of results per query.
    max_results: usize,
    /// Simulated lookup latency.
    delay: Duration,
}

impl TagCatalog {
    /// Create the default product category catalog.
    pub fn new() -> Self {
        let tags = CATEGORY_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| Tag::new(i as u64 + 1, *name))
            .collect();
        Self::with_tags(tags)
    }

    /// Create a catalog over an arbitrary tag list.
    pub fn with_tags(tags: Vec<Tag>) -> Self {
        Self {
            tags,
            max_results: DEFAULT_MAX_RESULTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }

    /// Set the maximum number of results per query.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the simulated lookup latency.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get all tags in the catalog.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Filter the catalog without the artificial delay.
    pub fn search(&self, query: &str) -> Vec<Tag> {
        let query_lower = query.to_lowercase();
        self.tags
            .iter()
            .filter(|tag| tag.name.to_lowercase().contains(&query_lower))
            .take(self.max_results)
            .cloned()
            .collect()
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionSource for TagCatalog {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, query: &str) -> Result<Vec<Tag>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let results = self.search(query);
        debug!(count = results.len(), "Catalog lookup complete");
        Ok(results)
    }
}
