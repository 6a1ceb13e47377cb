//! Tag input settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::{DEFAULT_DELAY_MS, DEFAULT_MAX_RESULTS};
use crate::debounce::DEFAULT_DEBOUNCE_MS;
use crate::ui::TagColor;

/// Default placeholder shown in an empty input.
pub const DEFAULT_PLACEHOLDER: &str = "Type to search...";

/// Settings for the tag input and its bundled catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Chip color for selected tags.
    pub tag_color: TagColor,
    /// Quiet interval before a fetch is triggered, in milliseconds.
    pub debounce_ms: u64,
    /// Simulated catalog latency, in milliseconds.
    pub source_delay_ms: u64,
    /// Maximum number of suggestions returned per query.
    pub max_results: usize,
    /// Placeholder text for the empty input.
    pub placeholder: String,
}

impl Settings {
    /// Get the debounce interval.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Get the simulated catalog latency.
    pub fn source_delay(&self) -> Duration {
        Duration::from_millis(self.source_delay_ms)
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if `max_results` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_color: TagColor::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            source_delay_ms: DEFAULT_DELAY_MS,
            max_results: DEFAULT_MAX_RESULTS,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}
