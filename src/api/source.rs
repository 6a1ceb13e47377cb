//! The suggestion source contract.

use async_trait::async_trait;

use super::error::Result;
use super::types::Tag;

/// A provider of tag candidates for a query.
///
/// Implementations are shared with background fetch tasks, so they must be
/// `Send + Sync`. Results are expected to be ordered by relevance; the tag
/// input does not reorder them.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Fetch candidates for the given query.
    async fn fetch(&self, query: &str) -> Result<Vec<Tag>>;
}
