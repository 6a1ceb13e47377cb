//! Event handling for the demo application.
//!
//! Terminal input is polled by [`EventHandler`] and converted into [`Event`]s
//! that drive `App::update`.

mod handler;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;

/// Events that drive the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse button, wheel or movement event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input arrived within the tick interval.
    Tick,
    /// The application should exit.
    Quit,
}
