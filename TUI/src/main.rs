mod action;
mod app;
mod backend;
mod command;
mod config;
mod models;
mod ui;
mod ui_state;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use action::Action;
use app::{App, Flow, Variant};
use backend::Backend;
use command::CommandParser;
use config::Config;
use ui::draw;

/// Send prompts to several LLM backends and compare their answers side by side
#[derive(Parser)]
#[command(name = "llm-compare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// One prompt per model, or one prompt shared by all
    #[arg(long, value_enum, default_value_t = Variant::Independent)]
    variant: Variant,

    /// Config file (defaults to <config dir>/llm-compare/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the backend host, e.g. http://127.0.0.1
    #[arg(long)]
    host: Option<String>,

    /// Log file (defaults to <tmp>/llm-compare.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Logs go to a file; stdout belongs to the terminal UI.
/// Tail with: tail -f /tmp/llm-compare.log, verbosity via RUST_LOG.
fn init_logging(log_file: Option<&Path>) -> Result<WorkerGuard> {
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("llm-compare.log"));
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("llm_compare=info")))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    info!(variant = ?cli.variant, host = %config.host, "starting");

    let backend = Backend::new().context("failed to build HTTP client")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(cli.variant, config);
    let result = run_app(&mut terminal, &mut app, &backend).await;

    // Restore terminal before any error is printed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn read_clipboard() -> Option<String> {
    match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => Some(text.chars().filter(|c| *c != '\r').collect()),
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            None
        }
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: &Backend,
) -> Result<()> {
    let (outcome_tx, mut outcomes) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(app.config.tick_rate_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| draw(frame, &mut *app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            Some(outcome) = outcomes.recv() => app.apply(outcome),
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                let Some(action) = CommandParser::parse(&event?) else {
                    continue;
                };
                let action = match action {
                    Action::Paste => match read_clipboard() {
                        Some(text) => Action::Insert(text),
                        None => continue,
                    },
                    other => other,
                };

                match app.handle(action) {
                    Flow::Continue => {}
                    Flow::Dispatch(submission) => {
                        backend::dispatch(backend, submission, outcome_tx.clone());
                    }
                    Flow::Quit => return Ok(()),
                }
            }
        }
    }
}
