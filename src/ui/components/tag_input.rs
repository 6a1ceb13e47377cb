//! Autocomplete multi-select tag input.
//!
//! The tag input owns the query text, the selected tags, the current
//! suggestions and the keyboard highlight. Typing arms a debounce timer; when
//! it fires the query is answered from the widget's cache or, on a miss, by a
//! background fetch against the suggestion source. Every selection or removal
//! is reported to the change callback with the complete selection.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --type--> Debouncing --timer--> Loading --ok--> Ready
//!                    |                    \--err--> Failed
//!                    \--timer (cached)--> Ready
//! ```
//!
//! Clearing the text from any phase returns to `Idle`. Background tasks
//! report through [`WidgetMessage`]s; the owner feeds them back with
//! [`TagInput::poll_messages`] or [`TagInput::handle_message`]. A message
//! produced for superseded input, or arriving after [`TagInput::unmount`], is
//! dropped without touching any state.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::suggestions::{render_suggestions, suggestion_at};
use super::tag_chip::{chip_spans, chips_width, remove_target};
use crate::api::{SuggestionSource, Tag};
use crate::cache::SuggestionCache;
use crate::config::{Settings, DEFAULT_PLACEHOLDER};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
use crate::tasks::{create_task_channel, TaskSpawner, WidgetMessage};
use crate::ui::theme::TagColor;

/// Message recorded when the suggestion source fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch suggestions";

/// Callback invoked with the complete selection after every change.
pub type ChangeCallback = Box<dyn FnMut(&[Tag])>;

/// Where the tag input is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// No query text.
    #[default]
    Idle,
    /// Query text present, waiting for the debounce interval.
    Debouncing,
    /// A fetch is in flight.
    Loading,
    /// Suggestions reflect the current query.
    Ready,
    /// The last fetch failed.
    Failed,
}

/// Action resulting from tag input events.
#[derive(Debug, Clone, PartialEq)]
pub enum TagInputAction {
    /// A tag was added to the selection.
    Selected(Tag),
    /// A tag was removed from the selection.
    Removed(Tag),
    /// The suggestion list was dismissed with Esc.
    Dismissed,
    /// Enter was pressed with nothing highlighted; carries the input text.
    ///
    /// The key was not consumed, so the host may apply its own behavior.
    Submit(String),
}

/// Configuration for a tag input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInputConfig {
    /// Chip color for selected tags.
    pub tag_color: TagColor,
    /// Quiet interval before a fetch is triggered.
    pub debounce: Duration,
    /// Placeholder shown while the input is empty.
    pub placeholder: String,
}

impl Default for TagInputConfig {
    fn default() -> Self {
        Self {
            tag_color: TagColor::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl From<&Settings> for TagInputConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            tag_color: settings.tag_color,
            debounce: settings.debounce(),
            placeholder: settings.placeholder.clone(),
        }
    }
}

/// Autocomplete tag input component.
pub struct TagInput {
    /// Display configuration and debounce interval.
    config: TagInputConfig,
    /// Current query text.
    input: String,
    /// Selected tags in selection order, unique by id.
    selected_tags: Vec<Tag>,
    /// Current suggestions, already excluding selected tags.
    suggestions: Vec<Tag>,
    /// Keyboard highlight within `suggestions`.
    highlighted: Option<usize>,
    /// Fetch lifecycle phase.
    phase: FetchPhase,
    /// Message for the last failed fetch.
    error: Option<String>,
    /// Results by exact query text.
    cache: SuggestionCache,
    /// Pending debounce timer.
    debouncer: Debouncer,
    /// Where suggestions come from.
    source: Arc<dyn SuggestionSource>,
    /// Starts timers and fetches that report to `rx`.
    spawner: TaskSpawner,
    /// Messages from background tasks.
    rx: mpsc::UnboundedReceiver<WidgetMessage>,
    /// Bumped on every text change; tags timers and fetches.
    generation: u64,
    /// False once the input has been torn down.
    mounted: bool,
    /// Consumer notification for selection changes.
    on_change: Option<ChangeCallback>,
    /// Area of the last render, for mouse hit testing.
    area: Cell<Rect>,
}

impl TagInput {
    /// Create a new tag input backed by `source`.
    ///
    /// Must be called within a tokio runtime, since typing spawns tasks.
    pub fn new(source: Arc<dyn SuggestionSource>, config: TagInputConfig) -> Self {
        let (rx, spawner) = create_task_channel();
        Self {
            debouncer: Debouncer::new(config.debounce),
            config,
            input: String::new(),
            selected_tags: Vec::new(),
            suggestions: Vec::new(),
            highlighted: None,
            phase: FetchPhase::Idle,
            error: None,
            cache: SuggestionCache::new(),
            source,
            spawner,
            rx,
            generation: 0,
            mounted: true,
            on_change: None,
            area: Cell::new(Rect::default()),
        }
    }

    /// Set the change callback, builder style.
    pub fn on_change(mut self, callback: impl FnMut(&[Tag]) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    /// Replace the change callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(&[Tag]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Get the current query text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Get the selected tags in selection order.
    pub fn selected_tags(&self) -> &[Tag] {
        &self.selected_tags
    }

    /// Get the current suggestions.
    pub fn suggestions(&self) -> &[Tag] {
        &self.suggestions
    }

    /// Get the highlighted suggestion index.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Get the highlighted suggestion.
    pub fn highlighted_tag(&self) -> Option<&Tag> {
        self.highlighted.and_then(|i| self.suggestions.get(i))
    }

    /// Get the fetch lifecycle phase.
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Get the message for the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check whether a timer or fetch is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.mounted && matches!(self.phase, FetchPhase::Debouncing | FetchPhase::Loading)
    }

    /// Get the suggestion cache.
    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Get the configuration.
    pub fn config(&self) -> &TagInputConfig {
        &self.config
    }

    /// Change the chip color.
    pub fn set_tag_color(&mut self, color: TagColor) {
        self.config.tag_color = color;
    }

    /// Check whether the input is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the dropdown should be drawn.
    pub fn shows_suggestions(&self) -> bool {
        !self.is_loading() && !self.suggestions.is_empty()
    }

    /// Replace the query text.
    ///
    /// Empty text clears the suggestions immediately and cancels any pending
    /// timer. Non-empty text (re)arms the debounce timer.
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        if !self.mounted {
            return;
        }

        self.input = text.into();
        self.generation += 1;
        self.highlighted = None;

        if self.input.is_empty() {
            self.debouncer.cancel();
            self.suggestions.clear();
            self.phase = FetchPhase::Idle;
            trace!(generation = self.generation, "Input cleared");
        } else {
            self.debouncer
                .schedule(&self.spawner, self.input.clone(), self.generation);
            self.phase = FetchPhase::Debouncing;
        }
    }

    /// Answer `query` from the cache or start a fetch for it.
    pub fn trigger_fetch(&mut self, query: &str) {
        if !self.mounted {
            return;
        }

        let cached = self
            .cache
            .get(query)
            .map(|tags| exclude_selected(tags, &self.selected_tags));

        self.error = None;
        match cached {
            Some(suggestions) => {
                debug!(query, count = suggestions.len(), "Suggestions served from cache");
                self.replace_suggestions(suggestions);
                self.phase = FetchPhase::Ready;
            }
            None => {
                debug!(query, generation = self.generation, "Fetching suggestions");
                self.phase = FetchPhase::Loading;
                self.spawner
                    .spawn_fetch(Arc::clone(&self.source), query.to_string(), self.generation);
            }
        }
    }

    /// Add `tag` to the selection and reset the query.
    ///
    /// Returns `true` if the tag was added. A tag whose id is already selected
    /// leaves the selection untouched, but the query is reset either way.
    pub fn select_tag(&mut self, tag: Tag) -> bool {
        if !self.mounted {
            return false;
        }

        let added = !self.selected_tags.contains(&tag);
        if added {
            debug!(id = tag.id, name = %tag.name, "Tag selected");
            self.selected_tags.push(tag);
            self.notify_change();
        }
        self.set_input_text(String::new());
        added
    }

    /// Remove the tag with `id` from the selection.
    ///
    /// The change callback is invoked even when no tag matched.
    pub fn remove_tag(&mut self, id: u64) -> Option<Tag> {
        if !self.mounted {
            return None;
        }

        let removed = self
            .selected_tags
            .iter()
            .position(|tag| tag.id == id)
            .map(|index| self.selected_tags.remove(index));
        debug!(id, removed = removed.is_some(), "Tag removal");
        self.notify_change();
        removed
    }

    /// Select the suggestion at `index`, as when it is clicked.
    pub fn click_suggestion(&mut self, index: usize) -> Option<TagInputAction> {
        let tag = self.suggestions.get(index).cloned()?;
        self.select_tag(tag.clone())
            .then_some(TagInputAction::Selected(tag))
    }

    /// Remove a chip, as when its remove control is clicked.
    pub fn click_remove(&mut self, id: u64) -> Option<TagInputAction> {
        self.remove_tag(id).map(TagInputAction::Removed)
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent view.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<TagInputAction> {
        if !self.mounted {
            return None;
        }
        trace!(?key, "Tag input key");

        match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => {
                if self.input.is_empty() {
                    let last = self.selected_tags.last()?.id;
                    return self.remove_tag(last).map(TagInputAction::Removed);
                }
                let mut text = self.input.clone();
                text.pop();
                self.set_input_text(text);
                None
            }
            (KeyCode::Down, _) => {
                self.highlight_next();
                None
            }
            (KeyCode::Up, _) => {
                self.highlight_previous();
                None
            }
            (KeyCode::Enter, _) => match self.highlighted_tag().cloned() {
                Some(tag) => self
                    .select_tag(tag.clone())
                    .then_some(TagInputAction::Selected(tag)),
                None => Some(TagInputAction::Submit(self.input.clone())),
            },
            (KeyCode::Esc, _) => {
                self.replace_suggestions(Vec::new());
                Some(TagInputAction::Dismissed)
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let mut text = self.input.clone();
                text.push(c);
                self.set_input_text(text);
                None
            }
            _ => None,
        }
    }

    /// Handle a mouse event against the last rendered layout.
    ///
    /// A left click on a chip's remove button removes that tag; a left click on
    /// a suggestion row selects it. Everything else is ignored.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<TagInputAction> {
        if !self.mounted || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let [chip_row, _, dropdown] = layout(self.area.get());
        let inner = input_block().inner(chip_row);

        if mouse.row == inner.y && mouse.column >= inner.x && mouse.column < inner.right() {
            let offset = usize::from(mouse.column - inner.x);
            let id = remove_target(&self.selected_tags, offset)?;
            trace!(id, "Chip remove clicked");
            return self.click_remove(id);
        }

        if self.shows_suggestions() {
            let index = suggestion_at(
                dropdown,
                self.suggestions.len(),
                self.highlighted,
                mouse.column,
                mouse.row,
            )?;
            trace!(index, "Suggestion clicked");
            return self.click_suggestion(index);
        }
        None
    }

    /// Apply a message from a background task.
    pub fn handle_message(&mut self, msg: WidgetMessage) {
        if !self.mounted {
            trace!(?msg, "Dropping message for unmounted input");
            return;
        }
        if msg.generation() != self.generation {
            trace!(
                stale = msg.generation(),
                current = self.generation,
                "Dropping stale message"
            );
            return;
        }

        match msg {
            WidgetMessage::DebounceElapsed { query, .. } => {
                self.debouncer.mark_fired();
                self.trigger_fetch(&query);
            }
            WidgetMessage::SuggestionsFetched { query, result, .. } => match result {
                Ok(tags) => {
                    let suggestions = exclude_selected(&tags, &self.selected_tags);
                    debug!(%query, count = suggestions.len(), "Suggestions fetched");
                    self.cache.insert(query, tags);
                    self.replace_suggestions(suggestions);
                    self.phase = FetchPhase::Ready;
                }
                Err(e) => {
                    warn!(%query, error = %e, "Suggestion fetch failed");
                    self.replace_suggestions(Vec::new());
                    self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                    self.phase = FetchPhase::Failed;
                }
            },
        }
    }

    /// Apply every message that has already arrived.
    ///
    /// Returns the number of messages drained.
    pub fn poll_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from a background task.
    pub async fn next_message(&mut self) -> Option<WidgetMessage> {
        self.rx.recv().await
    }

    /// Tear the input down.
    ///
    /// Cancels the pending timer. Anything still in flight is dropped when it
    /// arrives.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.debouncer.cancel();
        self.mounted = false;
        debug!(selected = self.selected_tags.len(), "Tag input unmounted");
    }

    /// Render the tag input.
    ///
    /// Draws the chip row with the query text, a status line for loading and
    /// errors, and the dropdown below.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);
        let [chip_row, status_row, dropdown] = layout(area);

        let block = input_block();
        let inner = block.inner(chip_row);

        let color = self.config.tag_color;
        let mut spans = chip_spans(&self.selected_tags, color);
        if self.input.is_empty() {
            spans.push(Span::styled(
                self.config.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                self.input.clone(),
                Style::default().fg(Color::White),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), chip_row);

        let cursor_offset =
            chips_width(&self.selected_tags, color) + Span::raw(self.input.as_str()).width();
        let cursor_x = inner
            .x
            .saturating_add(u16::try_from(cursor_offset).unwrap_or(u16::MAX))
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(cursor_x, inner.y));

        let status = if self.is_loading() {
            Some(Span::styled("Loading...", Style::default().fg(Color::Gray)))
        } else {
            self.error
                .as_deref()
                .map(|e| Span::styled(e.to_string(), Style::default().fg(Color::Red)))
        };
        if let Some(status) = status {
            frame.render_widget(Paragraph::new(Line::from(status)), status_row);
        }

        if self.shows_suggestions() {
            render_suggestions(frame, dropdown, &self.suggestions, self.highlighted);
        }
    }

    /// Move the highlight down, wrapping to the first suggestion.
    fn highlight_next(&mut self) {
        let count = self.suggestions.len();
        if count == 0 {
            self.highlighted = None;
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        });
    }

    /// Move the highlight up, wrapping to the last suggestion.
    fn highlight_previous(&mut self) {
        let count = self.suggestions.len();
        if count == 0 {
            self.highlighted = None;
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i > 0 && i < count => i - 1,
            _ => count - 1,
        });
    }

    /// Swap in a new suggestion list; the highlight never survives this.
    fn replace_suggestions(&mut self, suggestions: Vec<Tag>) {
        self.suggestions = suggestions;
        self.highlighted = None;
    }

    fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.selected_tags);
        }
    }
}

impl Drop for TagInput {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for TagInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagInput")
            .field("input", &self.input)
            .field("selected_tags", &self.selected_tags)
            .field("suggestions", &self.suggestions)
            .field("highlighted", &self.highlighted)
            .field("phase", &self.phase)
            .field("error", &self.error)
            .field("cached_queries", &self.cache.len())
            .field("generation", &self.generation)
            .field("mounted", &self.mounted)
            .finish()
    }
}

/// Split the widget area into the chip row, the status line and the dropdown.
fn layout(area: Rect) -> [Rect; 3] {
    let chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Chips and query
            Constraint::Length(1), // Loading / error
            Constraint::Min(0),    // Suggestions
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn input_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
}

/// Candidates minus anything already selected, order preserved.
fn exclude_selected(candidates: &[Tag], selected: &[Tag]) -> Vec<Tag> {
    candidates
        .iter()
        .filter(|tag| !selected.contains(tag))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers "empty" with nothing and everything else with two tags.
    struct StubSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
        delay: Duration,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
                delay: Duration::from_millis(50),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl SuggestionSource for StubSource {
        async fn fetch(&self, query: &str) -> crate::api::error::Result<Vec<Tag>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(FetchError::unavailable("stub failure"));
            }
            if query.is_empty() || query == "empty" {
                return Ok(Vec::new());
            }
            Ok(vec![electronics(), home_goods()])
        }
    }

    fn electronics() -> Tag {
        Tag::new(1, "Electronics")
    }

    fn home_goods() -> Tag {
        Tag::new(2, "Home Goods")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Build an input over `source`, recording every change notification.
    fn create_input(source: StubSource) -> (TagInput, Arc<AtomicUsize>, Rc<RefCell<Vec<Vec<Tag>>>>) {
        let calls = Arc::clone(&source.calls);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let input = TagInput::new(Arc::new(source), TagInputConfig::default())
            .on_change(move |tags| sink.borrow_mut().push(tags.to_vec()));
        (input, calls, changes)
    }

    /// Drive timers and fetches until nothing is outstanding.
    async fn settle(input: &mut TagInput) {
        while input.is_pending() {
            let msg = input.next_message().await.expect("task channel closed");
            input.handle_message(msg);
        }
    }

    async fn type_text(input: &mut TagInput, text: &str) {
        for c in text.chars() {
            input.handle_input(key(KeyCode::Char(c)));
        }
        settle(input).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_input() {
        let (input, calls, changes) = create_input(StubSource::new());
        assert_eq!(input.phase(), FetchPhase::Idle);
        assert!(input.input().is_empty());
        assert!(input.selected_tags().is_empty());
        assert!(input.suggestions().is_empty());
        assert_eq!(input.highlighted(), None);
        assert!(input.error().is_none());
        assert!(input.is_mounted());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(changes.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_and_displays_suggestions() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        assert_eq!(input.phase(), FetchPhase::Debouncing);

        settle(&mut input).await;

        assert_eq!(input.phase(), FetchPhase::Ready);
        assert_eq!(input.suggestions(), &[electronics(), home_goods()]);
        assert!(input.shows_suggestions());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(input.cache().contains("Elec"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_selects_and_resets_input() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        let action = input.click_suggestion(0);

        assert_eq!(action, Some(TagInputAction::Selected(electronics())));
        assert_eq!(changes.borrow().as_slice(), &[vec![electronics()]]);
        assert!(input.input().is_empty());
        assert!(input.suggestions().is_empty());
        assert_eq!(input.phase(), FetchPhase::Idle);
        assert_eq!(input.selected_tags(), &[electronics()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_out_of_range_is_noop() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        assert_eq!(input.click_suggestion(5), None);
        assert!(changes.borrow().is_empty());
        assert_eq!(input.input(), "Elec");
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_remove_chip() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(electronics());

        let action = input.click_remove(1);

        assert_eq!(action, Some(TagInputAction::Removed(electronics())));
        assert_eq!(changes.borrow().last().unwrap(), &Vec::<Tag>::new());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_fetch_per_settled_query() {
        let (mut input, calls, _) = create_input(StubSource::new());

        type_text(&mut input, "Elec").await;

        assert_eq!(input.input(), "Elec");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(input.cache().len(), 1);
        assert!(input.cache().contains("Elec"));
        assert!(!input.cache().contains("E"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_before_debounce_elapses() {
        let (mut input, calls, _) = create_input(StubSource::new());
        let start = tokio::time::Instant::now();
        input.set_input_text("Elec");

        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS - 1)).await;
        assert_eq!(input.poll_messages(), 0);
        assert_eq!(input.phase(), FetchPhase::Debouncing);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let msg = input.next_message().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(DEFAULT_DEBOUNCE_MS));
        input.handle_message(msg);

        assert_eq!(input.phase(), FetchPhase::Loading);
        assert!(input.is_loading());
        assert!(!input.shows_suggestions());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_query_skips_source() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        input.set_input_text("");
        assert_eq!(input.phase(), FetchPhase::Idle);
        assert!(input.suggestions().is_empty());

        input.set_input_text("Elec");
        settle(&mut input).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(input.phase(), FetchPhase::Ready);
        assert_eq!(input.suggestions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_requires_exact_match() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        input.set_input_text("elec");
        settle(&mut input).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(input.cache().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_result_excludes_selected() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;
        input.click_suggestion(0);

        input.set_input_text("Elec");
        settle(&mut input).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(input.suggestions(), &[home_goods()]);
        // The cache keeps the unfiltered result.
        assert_eq!(input.cache().get("Elec").unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_shows_nothing() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("empty");
        settle(&mut input).await;

        assert_eq!(input.phase(), FetchPhase::Ready);
        assert!(input.suggestions().is_empty());
        assert!(!input.shows_suggestions());
        assert!(input.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backspace_on_empty_input_removes_last_tag() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(electronics());
        changes.borrow_mut().clear();

        let action = input.handle_input(key(KeyCode::Backspace));

        assert_eq!(action, Some(TagInputAction::Removed(electronics())));
        assert_eq!(changes.borrow().as_slice(), &[Vec::<Tag>::new()]);
        assert!(input.selected_tags().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backspace_removes_in_reverse_selection_order() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.select_tag(electronics());
        input.select_tag(home_goods());

        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.selected_tags(), &[electronics()]);

        input.handle_input(key(KeyCode::Backspace));
        assert!(input.selected_tags().is_empty());

        // Nothing left to remove
        assert_eq!(input.handle_input(key(KeyCode::Backspace)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backspace_edits_text() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(electronics());
        changes.borrow_mut().clear();
        input.set_input_text("Ho");

        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.input(), "H");
        assert_eq!(input.phase(), FetchPhase::Debouncing);

        input.handle_input(key(KeyCode::Backspace));
        assert_eq!(input.input(), "");
        assert_eq!(input.phase(), FetchPhase::Idle);

        // Editing text never touches the selection
        assert_eq!(input.selected_tags(), &[electronics()]);
        assert!(changes.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_navigation_and_selection() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        input.handle_input(key(KeyCode::Down));
        input.handle_input(key(KeyCode::Down));
        input.handle_input(key(KeyCode::Up));
        let action = input.handle_input(key(KeyCode::Enter));

        assert_eq!(action, Some(TagInputAction::Selected(electronics())));
        assert_eq!(changes.borrow().as_slice(), &[vec![electronics()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_wraps_circularly() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;
        let count = input.suggestions().len();

        input.handle_input(key(KeyCode::Down));
        assert_eq!(input.highlighted(), Some(0));

        for _ in 0..count {
            input.handle_input(key(KeyCode::Down));
        }
        assert_eq!(input.highlighted(), Some(0));

        input.handle_input(key(KeyCode::Up));
        assert_eq!(input.highlighted(), Some(count - 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_up_from_none_goes_to_last() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        input.handle_input(key(KeyCode::Up));
        assert_eq!(input.highlighted(), Some(1));
        assert_eq!(input.highlighted_tag(), Some(&home_goods()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_without_suggestions() {
        let (mut input, _, _) = create_input(StubSource::new());

        input.handle_input(key(KeyCode::Down));
        assert_eq!(input.highlighted(), None);

        input.handle_input(key(KeyCode::Up));
        assert_eq!(input.highlighted(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_highlight_submits() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;

        let action = input.handle_input(key(KeyCode::Enter));

        assert_eq!(action, Some(TagInputAction::Submit("Elec".to_string())));
        assert!(changes.borrow().is_empty());
        assert_eq!(input.suggestions().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_clears_suggestions_only() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;
        input.handle_input(key(KeyCode::Down));

        let action = input.handle_input(key(KeyCode::Esc));

        assert_eq!(action, Some(TagInputAction::Dismissed));
        assert!(input.suggestions().is_empty());
        assert_eq!(input.highlighted(), None);
        assert_eq!(input.input(), "Elec");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_resets_highlight() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        settle(&mut input).await;
        input.handle_input(key(KeyCode::Down));
        assert_eq!(input.highlighted(), Some(0));

        input.handle_input(key(KeyCode::Char('t')));

        assert_eq!(input.highlighted(), None);
        assert_eq!(input.input(), "Elect");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_duplicate_is_idempotent() {
        let (mut input, _, changes) = create_input(StubSource::new());
        assert!(input.select_tag(electronics()));

        input.set_input_text("Elec");
        let added = input.select_tag(Tag::new(1, "Electronics again"));

        assert!(!added);
        assert_eq!(input.selected_tags(), &[electronics()]);
        assert_eq!(changes.borrow().len(), 1);
        assert!(input.input().is_empty());
        assert!(input.suggestions().is_empty());
        assert_eq!(input.phase(), FetchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_preserves_order() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(home_goods());
        input.select_tag(electronics());

        assert_eq!(input.selected_tags(), &[home_goods(), electronics()]);
        assert_eq!(
            changes.borrow().last().unwrap(),
            &vec![home_goods(), electronics()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_absent_tag_still_notifies() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(electronics());
        changes.borrow_mut().clear();

        let removed = input.remove_tag(99);

        assert!(removed.is_none());
        assert_eq!(changes.borrow().as_slice(), &[vec![electronics()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_sets_error() {
        let (mut input, calls, changes) = create_input(StubSource::failing());
        input.select_tag(electronics());
        input.set_input_text("Elec");
        settle(&mut input).await;

        assert_eq!(input.phase(), FetchPhase::Failed);
        assert_eq!(input.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(input.suggestions().is_empty());
        assert!(!input.cache().contains("Elec"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The selection keeps working and the callback never sees the error.
        input.handle_input(key(KeyCode::Backspace)); // edits text
        input.set_input_text("");
        input.handle_input(key(KeyCode::Backspace));
        assert!(input.selected_tags().is_empty());
        assert_eq!(changes.borrow().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_cleared_when_next_fetch_starts() {
        let (mut input, _, _) = create_input(StubSource::failing());
        input.set_input_text("Elec");
        settle(&mut input).await;
        assert!(input.error().is_some());

        input.set_input_text("Elect");
        // Still shown while debouncing
        assert!(input.error().is_some());

        let msg = input.next_message().await.unwrap();
        input.handle_message(msg);

        assert_eq!(input.phase(), FetchPhase::Loading);
        assert!(input.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fetch_result_is_dropped() {
        let source = StubSource {
            delay: Duration::from_millis(1_000),
            ..StubSource::new()
        };
        let (mut input, calls, _) = create_input(source);

        input.set_input_text("Elec");
        let msg = input.next_message().await.unwrap();
        input.handle_message(msg);
        assert!(input.is_loading());

        input.set_input_text("empty");
        settle(&mut input).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(input.input(), "empty");
        assert!(input.suggestions().is_empty());
        assert!(input.cache().contains("empty"));
        // The "Elec" fetch resolved during settle but was superseded.
        assert!(!input.cache().contains("Elec"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_debounce_message_is_dropped() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        let stale = WidgetMessage::DebounceElapsed {
            query: "E".to_string(),
            generation: 0,
        };

        input.handle_message(stale);

        assert_eq!(input.phase(), FetchPhase::Debouncing);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_cancels_pending_timer() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");

        input.unmount();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(input.poll_messages(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!input.is_mounted());
        assert!(!input.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_drops_in_flight_result() {
        let (mut input, calls, _) = create_input(StubSource::new());
        input.set_input_text("Elec");
        let msg = input.next_message().await.unwrap();
        input.handle_message(msg);
        assert!(input.is_loading());

        input.unmount();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(input.poll_messages(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(input.suggestions().is_empty());
        assert!(input.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_ignored_after_unmount() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.unmount();

        assert!(!input.select_tag(electronics()));
        assert_eq!(input.handle_input(key(KeyCode::Char('x'))), None);
        assert!(input.input().is_empty());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            tag_color: TagColor::Green,
            debounce_ms: 120,
            ..Settings::default()
        };
        let config = TagInputConfig::from(&settings);
        assert_eq!(config.tag_color, TagColor::Green);
        assert_eq!(config.debounce, Duration::from_millis(120));
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_shows_chips_and_placeholder() {
        use ratatui::{backend::TestBackend, Terminal};

        let (mut input, _, _) = create_input(StubSource::new());
        input.select_tag(electronics());

        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();
        terminal.draw(|frame| input.render(frame, frame.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..50u16).map(|x| buffer[(x, 1u16)].symbol().to_string()).collect();
        assert!(row.contains("Electronics ×"));
        assert!(row.contains("Type to search..."));
    }

    struct CrashingSource;

    #[async_trait]
    impl SuggestionSource for CrashingSource {
        async fn fetch(&self, _query: &str) -> crate::api::error::Result<Vec<Tag>> {
            panic!("source crashed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_crashed_source_moves_to_failed() {
        let mut input = TagInput::new(Arc::new(CrashingSource), TagInputConfig::default());
        input.set_input_text("Elec");

        settle(&mut input).await;

        assert_eq!(input.phase(), FetchPhase::Failed);
        assert_eq!(input.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(!input.is_pending());
        assert!(input.suggestions().is_empty());
        assert!(!input.cache().contains("Elec"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_instances_share_no_state() {
        let (mut first, first_calls, _) = create_input(StubSource::new());
        let (mut second, second_calls, _) = create_input(StubSource::new());

        type_text(&mut first, "Elec").await;
        second.set_input_text("Elec");
        first.unmount();
        settle(&mut second).await;

        assert!(first.cache().contains("Elec"));
        assert!(second.cache().contains("Elec"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.phase(), FetchPhase::Ready);
        assert_eq!(second.suggestions(), &[electronics(), home_goods()]);
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(input: &TagInput) -> ratatui::Terminal<ratatui::backend::TestBackend> {
        let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(50, 12)).unwrap();
        terminal.draw(|frame| input.render(frame, frame.area())).unwrap();
        terminal
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_chip_marker_removes_that_tag() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(Tag::new(1, "A"));
        input.select_tag(Tag::new(2, "B"));
        input.select_tag(Tag::new(3, "C"));
        draw(&input);

        // Chip row starts at (1, 1); " B × " covers columns 7..12.
        assert_eq!(input.handle_mouse(left_click(8, 1)), None);
        let action = input.handle_mouse(left_click(10, 1));

        assert_eq!(action, Some(TagInputAction::Removed(Tag::new(2, "B"))));
        assert_eq!(input.selected_tags(), &[Tag::new(1, "A"), Tag::new(3, "C")]);
        assert_eq!(
            changes.borrow().last().unwrap(),
            &vec![Tag::new(1, "A"), Tag::new(3, "C")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_suggestion_row_selects() {
        let (mut input, _, changes) = create_input(StubSource::new());
        type_text(&mut input, "Elec").await;
        draw(&input);

        // Chip box rows 0..3, status row 3, dropdown border row 4, items from 5.
        let action = input.handle_mouse(left_click(5, 6));

        assert_eq!(action, Some(TagInputAction::Selected(home_goods())));
        assert_eq!(changes.borrow().as_slice(), &[vec![home_goods()]]);
        assert!(input.input().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mouse_ignored_outside_targets() {
        let (mut input, _, changes) = create_input(StubSource::new());
        input.select_tag(electronics());
        draw(&input);

        let right_click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            ..left_click(13, 1)
        };
        assert_eq!(input.handle_mouse(right_click), None);
        assert_eq!(input.handle_mouse(left_click(5, 8)), None);
        assert_eq!(input.selected_tags(), &[electronics()]);
        assert_eq!(changes.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_counts_wide_characters() {
        let (mut input, _, _) = create_input(StubSource::new());
        input.set_input_text("日本");
        let mut terminal = draw(&input);

        // Two double-width characters after the left border.
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(5, 1));
    }
}
