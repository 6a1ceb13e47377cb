//! User interface components.
//!
//! The tag input and the pieces it renders with. Everything here draws onto a
//! `ratatui::Frame`; state transitions live in [`TagInput`].

mod components;
pub mod theme;

pub use components::{
    chip_span, chip_spans, chips_width, remove_target, render_suggestions, suggestion_at,
    suggestion_items, ChangeCallback, FetchPhase, TagInput, TagInputAction, TagInputConfig,
    FETCH_ERROR_MESSAGE, REMOVE_MARKER,
};
pub use theme::TagColor;
