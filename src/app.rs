//! Demo application state and event loop.
//!
//! A single page hosting one tag input, a chip color picker and a status line
//! that echoes the most recent change notification. Follows The Elm
//! Architecture: events go through [`App::update`], drawing is a pure
//! projection in [`App::render`].

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::{SuggestionSource, Tag, TagCatalog};
use crate::config::Settings;
use crate::events::Event;
use crate::ui::{TagInput, TagInputAction, TagInputConfig};

/// The main application struct that holds all state.
pub struct App {
    /// Whether the application should quit.
    should_quit: bool,
    /// The hosted tag input.
    input: TagInput,
    /// JSON of the selection from the latest change notification.
    last_change: Rc<RefCell<Option<String>>>,
    /// Transient hint shown in the status line.
    hint: Option<String>,
}

impl App {
    /// Create the demo app with the bundled catalog.
    pub fn new(settings: &Settings) -> Self {
        let catalog = TagCatalog::new()
            .max_results(settings.max_results)
            .delay(settings.source_delay());
        Self::with_source(Arc::new(catalog), settings)
    }

    /// Create the demo app with a custom suggestion source.
    pub fn with_source(source: Arc<dyn SuggestionSource>, settings: &Settings) -> Self {
        debug!(?settings, "Creating application");
        let last_change = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_change);

        let input = TagInput::new(source, TagInputConfig::from(settings)).on_change(
            move |tags: &[Tag]| match serde_json::to_string(tags) {
                Ok(json) => {
                    info!(tags = %json, "Selection changed");
                    *sink.borrow_mut() = Some(json);
                }
                Err(e) => warn!(error = %e, "Could not serialize selection"),
            },
        );

        Self {
            should_quit: false,
            input,
            last_change,
            hint: None,
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the hosted tag input.
    pub fn input(&self) -> &TagInput {
        &self.input
    }

    /// Get the JSON of the selection from the latest change notification.
    pub fn last_change(&self) -> Option<String> {
        self.last_change.borrow().clone()
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => self.quit(),
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::Mouse(mouse_event) => {
                if let Some(action) = self.input.handle_mouse(mouse_event) {
                    trace!(?action, "Mouse action");
                    self.hint = None;
                }
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {}
        }
        self.input.poll_messages();
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.quit();
                return;
            }
            (KeyCode::Tab, _) => {
                let color = self.input.config().tag_color.next();
                debug!(%color, "Tag color changed");
                self.input.set_tag_color(color);
                return;
            }
            _ => {}
        }

        self.hint = None;
        if let Some(TagInputAction::Submit(text)) = self.input.handle_input(key_event) {
            if !text.is_empty() {
                self.hint = Some("Use ↑/↓ to pick a suggestion, then Enter".to_string());
            }
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.input.unmount();
        self.should_quit = true;
    }

    /// Render the page.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(2), // Color picker
                Constraint::Min(6),    // Tag input
                Constraint::Length(1), // Last change
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        let title = Paragraph::new("Smart Tag Input Demo")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let current = self.input.config().tag_color;
        let picker = Line::from(vec![
            Span::styled("Select Tag Color: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" {} ", current.label()),
                Style::default().fg(current.text_color()).bg(current.color()),
            ),
            Span::styled("  (Tab to change)", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(picker).alignment(Alignment::Center), chunks[1]);

        self.input.render(frame, chunks[2]);

        let status = match (&self.hint, self.last_change()) {
            (Some(hint), _) => Span::styled(hint.clone(), Style::default().fg(Color::Yellow)),
            (None, Some(json)) => Span::raw(format!("onChange: {}", json)),
            (None, None) => Span::styled("onChange: -", Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[3]);

        let help = Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(": navigate  "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(": select  "),
            Span::styled("Backspace", Style::default().fg(Color::Yellow)),
            Span::raw(": remove last  "),
            Span::styled("Click ×", Style::default().fg(Color::Yellow)),
            Span::raw(": remove  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(": hide  "),
            Span::styled("Ctrl+C", Style::default().fg(Color::Red)),
            Span::raw(": quit"),
        ]);
        frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), chunks[4]);
    }
}
