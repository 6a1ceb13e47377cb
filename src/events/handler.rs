//! Event handler implementation.
//!
//! Polls crossterm for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// The tick rate for the event loop in milliseconds.
///
/// Background results are applied on every tick, so this bounds how long a
/// finished fetch waits before it shows up.
const TICK_RATE_MS: u64 = 50;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    /// The tick rate duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(TICK_RATE_MS),
        }
    }

    /// Poll for the next event.
    ///
    /// This method blocks until an event is available or the tick rate elapses.
    /// Returns `Event::Tick` if no event occurred within the tick rate.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            // No event within tick rate, return tick event
            Ok(Event::Tick)
        }
    }
}

/// Map a crossterm event onto an application event.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        // Windows reports releases too; only presses and held-key repeats count
        CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Release => Event::Tick,
        CrosstermEvent::Key(key_event) => Event::Key(key_event),
        CrosstermEvent::Mouse(mouse_event) => Event::Mouse(mouse_event),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        // Focus and paste events are not handled
        CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => {
            Event::Tick
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
