//! xseedtui - interactive cross-seed trigger for qBittorrent
//!
//! # Usage
//!
//! ```bash
//! # Pick torrents in the terminal UI
//! xseedtui
//!
//! # Trigger known hashes directly
//! xseedtui -i <HASH> <HASH> --no-single-episodes
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use xseedtui::app::App;
use xseedtui::cli::{Cli, ExitCode, Output};
use xseedtui::config::Config;
use xseedtui::models::SessionOutcome;
use xseedtui::selection::SelectionEngine;
use xseedtui::{commands, logging, ui};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new(&cli);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(e.to_string(), ExitCode::ConfigError).into(),
    };

    let _log_guard = logging::init(cli.verbose, &config.log_dir());
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?Config::source_path(cli.config.as_deref()),
        cross_seed = %config.cross_seed.base_url(),
        qbittorrent = %config.qbittorrent.base_url(),
        "Starting xseedtui"
    );

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return output.error(e.to_string(), ExitCode::ConfigError).into();
    }

    let dispatcher = commands::cross_seed_dispatcher(&config, cli.include_single_episodes());
    commands::run_cmd(
        &cli,
        || commands::connect_cmd(&config.qbittorrent, &output),
        &dispatcher,
        run_tui,
        &output,
    )
    .await
    .into()
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the picker until the user confirms or cancels
fn run_tui(engine: SelectionEngine) -> Result<SessionOutcome> {
    logging::mute_console(true);
    let mut terminal = match init_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            // Raw mode may already be on
            let _ = disable_raw_mode();
            logging::mute_console(false);
            return Err(e);
        }
    };

    let mut app = App::new(engine);
    let result = run_event_loop(&mut terminal, &mut app);

    // Always restore terminal, even on error
    let restored = restore_terminal(&mut terminal);
    logging::mute_console(false);
    result?;
    restored?;

    let outcome = app.into_outcome();
    tracing::info!(
        cancelled = outcome.is_cancelled(),
        selected = outcome.hashes().len(),
        "Session ended"
    );
    Ok(outcome)
}

/// Main event loop - handles input, updates state, renders UI
fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running() {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                _ => {}
            }
        }
    }

    Ok(())
}
