//! Chip rendering for selected tags.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::api::Tag;
use crate::ui::theme::TagColor;

/// Marker shown after each chip label; stands for the remove button.
pub const REMOVE_MARKER: &str = "×";

/// Columns at the end of a chip that act as its remove button (` × `).
const REMOVE_HIT_WIDTH: usize = 3;

fn chip_label(tag: &Tag) -> String {
    format!(" {} {} ", tag.name, REMOVE_MARKER)
}

/// Build the span for a single chip, e.g. ` Electronics × `.
pub fn chip_span(tag: &Tag, color: TagColor) -> Span<'static> {
    Span::styled(
        chip_label(tag),
        Style::default()
            .fg(color.text_color())
            .bg(color.color())
            .add_modifier(Modifier::BOLD),
    )
}

/// Build spans for all chips separated by single spaces.
///
/// A trailing space is added when there is at least one chip so that the
/// input text does not touch the last chip.
pub fn chip_spans(tags: &[Tag], color: TagColor) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for tag in tags {
        spans.push(chip_span(tag, color));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Get the rendered width of the chip row.
pub fn chips_width(tags: &[Tag], color: TagColor) -> usize {
    Line::from(chip_spans(tags, color)).width()
}

/// Find the chip whose remove button covers `offset`.
///
/// `offset` is the column relative to the start of the chip row. Returns the
/// id of the tag to remove, or `None` when the column misses every button.
pub fn remove_target(tags: &[Tag], offset: usize) -> Option<u64> {
    let mut start = 0;
    for tag in tags {
        let end = start + Span::raw(chip_label(tag)).width();
        if offset < end && offset + REMOVE_HIT_WIDTH >= end {
            return Some(tag.id);
        }
        // Chips are separated by one space.
        start = end + 1;
    }
    None
}
