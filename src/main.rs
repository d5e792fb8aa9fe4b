mod app;
mod backend;
mod config;
mod handlers;
mod model;
mod services;
mod state;
mod ui;

use std::{env, fs, io, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::{App, AppEvent, BackendEvent, TICK_MS};
use backend::memory::MemoryBackend;
use backend::remote::RemoteBackend;
use backend::Backend;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    init_tracing(&config)?;

    // `--dev` runs against the in-process backend, no hosted service needed
    let backend = if env::args().any(|a| a == "--dev") {
        tracing::info!("using in-memory backend (dev mode)");
        Backend::from_single(Arc::new(MemoryBackend::new()))
    } else {
        tracing::info!(url = %config.backend_url, "using hosted backend");
        Backend::from_single(Arc::new(RemoteBackend::new(
            &config.backend_url,
            &config.api_key,
        )))
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut app = App::new(config, backend.clone(), event_tx.clone());
    app.bootstrap();

    // Spawn terminal event handler
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
        loop {
            interval.tick().await;

            // Check for terminal events (non-blocking)
            if event::poll(Duration::from_millis(0)).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if tx.send(AppEvent::Terminal(ev)).is_err() {
                        break;
                    }
                }
            }

            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Forward identity changes into the event loop
    let tx = event_tx.clone();
    let mut identity_rx = backend.auth.watch_identity();
    tokio::spawn(async move {
        while identity_rx.changed().await.is_ok() {
            let identity = identity_rx.borrow().clone();
            if tx
                .send(AppEvent::Backend(BackendEvent::IdentityChanged(identity)))
                .is_err()
            {
                break;
            }
        }
    });

    // Main application loop
    while !app.ui.should_quit {
        terminal.draw(|f| ui::ui(f, &mut app))?;

        if let Some(event) = event_rx.recv().await {
            match event {
                AppEvent::Terminal(CEvent::Key(key)) => handlers::handle_key_event(key, &mut app),
                AppEvent::Terminal(_) => {}
                AppEvent::Backend(backend_event) => app.handle_backend_event(backend_event),
                AppEvent::Tick => app.on_tick(),
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Tracing goes to a file; the terminal belongs to the UI.
fn init_tracing(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let file = fs::File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
