//! Gatehouse - a keyboard-driven TUI scaffold with token-gated screens.
//!
//! Three destinations: a public home screen, a login screen with eager
//! client-side validation, and a protected dashboard behind a token-based
//! session guard.

mod api;
mod app;
mod auth;
mod config;
mod routes;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use config::Environment;
use ui::input::handle_input;
use ui::render::render;

/// Timeout for polling terminal events (in milliseconds).
/// Short enough for the password reveal deadline to feel immediate.
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug);
/// development mode defaults to debug, production to warn.
fn init_tracing(environment: Environment) {
    let default_filter = if environment.is_production() {
        "warn"
    } else {
        "gatehouse=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let environment = Environment::detect();
    init_tracing(environment);
    info!(?environment, "Gatehouse starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new()?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Gatehouse shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let now = Instant::now();
        terminal.draw(|f| render(f, app, now))?;

        // Poll with a timeout so the reveal deadline is checked even when
        // no keys arrive.
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key, Instant::now())? {
                    return Ok(());
                }
            }
        }

        // Perform an armed login attempt after drawing one frame with the
        // submit control disabled; the backend call is the only suspension
        // point in the loop.
        if app.login_in_flight() {
            terminal.draw(|f| render(f, app, Instant::now()))?;
            app.submit_login().await;
        }

        app.tick(Instant::now());
    }
}
