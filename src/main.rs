use std::{
    io::{self, Write},
    panic,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    cursor::Show,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use task_board::{
    app::App,
    logging::{init_logging, print_log_location},
    realm::{RootId, apply_message, init_application, should_quit},
    settings::{API_URL_ENV, Settings},
};

#[derive(Parser, Debug)]
#[command(
    name = "task-board",
    about = "Terminal task board over the Task Board REST API",
    long_about = "A TUI task board that lists, creates, completes, and deletes tasks \
                  against a Task Board REST backend, with optimistic local updates.",
    version = env!("TASK_BOARD_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Backend origin, e.g. http://127.0.0.1:8000 (the client appends /api)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Start with focus mode on (hide completed tasks)
    #[arg(long)]
    focus: bool,
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    let result = run_app();
    if let Some(path) = log_path.as_ref() {
        print_log_location(path);
    }
    result
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load();
    settings.api_url = resolve_api_url(
        cli.api_url.as_deref(),
        std::env::var(API_URL_ENV).ok().as_deref(),
        &settings.api_url,
    );
    tracing::info!(api_url = %settings.api_url, "starting task board");

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(settings, cli.focus)?));
    app.lock()
        .map_err(|_| anyhow!("failed to lock app state"))?
        .load_tasks();
    let mut realm = init_application(Arc::clone(&app))?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Root, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            apply_message(&app, message)?;
        }
    }

    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(())
}

/// Backend origin resolution: CLI flag, then environment, then settings file.
fn resolve_api_url(flag: Option<&str>, env_value: Option<&str>, settings_url: &str) -> String {
    let candidate = flag
        .or(env_value)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(settings_url);
    candidate.trim_end_matches('/').to_string()
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: std::path::PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!("  📝 Log file: {}", log_path.display());
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(stderr, LeaveAlternateScreen, Show, ResetColor);
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
