//! Vantage: a terminal analytics dashboard built with ratatui.
//!
//! This binary initialises the terminal, runs the main event loop,
//! and restores the terminal on exit or panic.

mod app;
mod background;
mod input;
mod panes;
mod render;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use vantage_core::{
    Config, CoreError, Dashboard, FileStore, KeyValueStore, OrderStore, ReqwestClient, TokenStore,
};

use crate::app::App;
use crate::background::{dispatch, FetchMessage, Providers};
use crate::input::handle_key;
use crate::render::render;

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Logs go to a file so they never draw over the UI. Without a writable
/// log file the app runs silently.
fn init_logging() {
    let path = std::env::temp_dir().join("vantage.log");
    match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .init(),
        Err(e) => eprintln!("Logging disabled, cannot open {}: {e}", path.display()),
    }
}

/// Config files to try, in order: the first CLI argument, the project
/// directory, then the user's config directory.
fn config_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::env::args().nth(1).map(PathBuf::from).into_iter().collect();
    candidates.push(PathBuf::from("config/vantage.toml"));
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".config/vantage/vantage.toml"));
    }
    candidates
}

/// Loads the first existing candidate. A file that exists but cannot be
/// used falls back to defaults and yields a notice for the status bar.
fn load_config(candidates: &[PathBuf]) -> (Config, Option<String>) {
    for path in candidates {
        match Config::load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                return (config, None);
            }
            Err(CoreError::NotFound(_)) => continue,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {e}", path.display());
                return (
                    Config::default(),
                    Some(format!("Using defaults, {}: {e}", path.display())),
                );
            }
        }
    }
    tracing::info!("No config file found, using defaults");
    (Config::default(), None)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let (mut config, notice) = load_config(&config_candidates());
    config.apply_env();

    install_panic_hook();

    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, config, notice).await;

    restore_terminal(&mut terminal)?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    notice: Option<String>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchMessage>();

    let state_path = config.storage.resolved_path();
    tracing::info!("State file: {}", state_path.display());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(state_path));
    let dashboard = Dashboard::new(OrderStore::new(store.clone()));
    let tokens = TokenStore::new(store)
        .with_default_ttl(Duration::from_secs(config.music.default_ttl_secs));

    let client = ReqwestClient::new(&config.http.user_agent)?;
    let providers = Providers::new(Arc::new(client), &config);

    let mut app = App::new(dashboard, &config, tokens, tx.clone());
    if let Some(msg) = notice {
        app = app.with_status(msg);
    }

    loop {
        // 1. Commit finished background work
        while let Ok(msg) = rx.try_recv() {
            for request in app.receive(msg) {
                dispatch(&providers, request, &tx);
            }
        }

        // 2. Render
        terminal.draw(|f| render(f, &app))?;

        if app.should_quit() {
            break;
        }

        // 3. Poll for crossterm events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = handle_key(key, &app.mode());
                for request in app.apply(action) {
                    dispatch(&providers, request, &tx);
                }
            }
        }
    }

    Ok(())
}
