//! tagpick demo - a terminal page hosting one smart tag input.

use std::io::{self, Stdout};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;

use tagpick::app::App;
use tagpick::config::Settings;
use tagpick::error::{AppError, Result};
use tagpick::events::EventHandler;
use tagpick::logging;
use tagpick::ui::TagColor;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Autocomplete multi-select tag input demo.
#[derive(Debug, Parser)]
#[command(name = "tagpick", version, about)]
struct Cli {
    /// Path to a config file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chip color: blue, red, green, yellow or purple.
    #[arg(long)]
    color: Option<TagColor>,

    /// Quiet interval before suggestions are fetched, in milliseconds.
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Simulated catalog latency, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Maximum number of suggestions per query.
    #[arg(long)]
    max_results: Option<usize>,

    /// Directory for log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    /// Load settings and apply command-line overrides.
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let Some(color) = self.color {
            settings.tag_color = color;
        }
        if let Some(ms) = self.debounce_ms {
            settings.debounce_ms = ms;
        }
        if let Some(ms) = self.delay_ms {
            settings.source_delay_ms = ms;
        }
        if let Some(n) = self.max_results {
            settings.max_results = n;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.clone())?;

    let settings = cli.settings().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        anyhow::anyhow!(e.user_message())
    })?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, App::new(&settings));
    restore_terminal(&mut terminal)?;

    logging::shutdown();
    Ok(result?)
}

fn run(terminal: &mut Tui, mut app: App) -> Result<()> {
    let events = EventHandler::new();
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;
        let event = events.next()?;
        app.update(event);
    }
    Ok(())
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    let terminal = execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    terminal.map_err(|e| {
        reset_terminal();
        e.into()
    })
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort terminal reset for paths that cannot report errors.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
}

/// Restore the terminal before the default hook prints a panic.
///
/// Panics on runtime worker threads come from fetch tasks, which the tag input
/// already recovers from, so only the main thread resets the screen.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if std::thread::current().name() == Some("main") {
            reset_terminal();
        }
        error!(%info, "Panic");
        default_hook(info);
    }));
}
