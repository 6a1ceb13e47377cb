//! Suggestion sources and the types they exchange.
//!
//! The tag input only depends on the [`SuggestionSource`] trait; the bundled
//! [`TagCatalog`] is an in-memory implementation with simulated latency.

mod catalog;
pub mod error;
mod source;
pub mod types;

pub use catalog::{TagCatalog, DEFAULT_DELAY_MS, DEFAULT_MAX_RESULTS};
pub use error::FetchError;
pub use source::SuggestionSource;
pub use types::Tag;
