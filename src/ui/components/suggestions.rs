//! Suggestion dropdown rendering.

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::api::Tag;

/// Build list items for the dropdown.
pub fn suggestion_items(suggestions: &[Tag]) -> Vec<ListItem<'static>> {
    suggestions
        .iter()
        .map(|tag| ListItem::new(format!("  {}", tag.name)))
        .collect()
}

fn dropdown_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
}

/// Find the suggestion drawn at (`column`, `row`) by [`render_suggestions`].
///
/// Rows are one line each. When the highlight sits below the visible rows
/// the list is scrolled just enough to show it, same as the list widget does.
pub fn suggestion_at(
    area: Rect,
    count: usize,
    highlighted: Option<usize>,
    column: u16,
    row: u16,
) -> Option<usize> {
    let inner = dropdown_block().inner(area);
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let visible = usize::from(inner.height);
    let offset = match highlighted {
        Some(i) if i >= visible => i + 1 - visible,
        _ => 0,
    };
    let index = offset + usize::from(row - inner.y);
    (index < count).then_some(index)
}

/// Render the dropdown with the highlighted row marked.
///
/// Nothing is drawn for an empty list.
pub fn render_suggestions(
    frame: &mut Frame,
    area: Rect,
    suggestions: &[Tag],
    highlighted: Option<usize>,
) {
    if suggestions.is_empty() || area.height == 0 {
        return;
    }

    let list = List::new(suggestion_items(suggestions))
        .block(dropdown_block())
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(highlighted);

    frame.render_stateful_widget(list, area, &mut state);
}
