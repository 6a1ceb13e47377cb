//! tagpick - an autocomplete multi-select tag input for the terminal.
//!
//! The [`ui::TagInput`] component debounces typing, answers queries from a
//! per-instance cache or a [`api::SuggestionSource`], and keeps an ordered,
//! duplicate-free selection that is reported to a change callback.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod logging;
pub mod tasks;
pub mod ui;
