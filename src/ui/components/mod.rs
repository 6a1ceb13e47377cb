//! Reusable UI components.

mod suggestions;
mod tag_chip;
mod tag_input;

pub use suggestions::{render_suggestions, suggestion_at, suggestion_items};
pub use tag_chip::{chip_span, chip_spans, chips_width, remove_target, REMOVE_MARKER};
pub use tag_input::{
    ChangeCallback, FetchPhase, TagInput, TagInputAction, TagInputConfig, FETCH_ERROR_MESSAGE,
};
