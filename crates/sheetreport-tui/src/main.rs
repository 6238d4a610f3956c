use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use sheetreport_core::{Command, Completion, HttpApi, ReportApi, executor};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod action;
mod app;
mod input;
mod logging;
mod model;
mod settings;
mod theme;
mod view;

use app::App;
use settings::{Overrides, Settings};

/// Terminal client for generating aggregated reports from uploaded spreadsheets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Report server base URL (env: SHEETREPORT_URL)
    #[arg(long)]
    server: Option<String>,

    /// Pre-fill the login email (env: SHEETREPORT_EMAIL)
    #[arg(long)]
    email: Option<String>,

    /// Read settings from this TOML file instead of the usual locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme: default or mono
    #[arg(long)]
    theme: Option<String>,

    /// Per-request timeout in seconds; 0 disables it
    #[arg(long)]
    request_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Held until exit so buffered log lines reach the file.
    let _log_guard = match logging::log_dir() {
        Some(dir) => logging::init_logging(&dir).ok(),
        None => None,
    };

    let file = settings::load_file(args.config.as_deref());
    let settings = Settings::resolve(
        Overrides {
            server: args.server,
            email: args.email,
            theme: args.theme,
            request_timeout_secs: args.request_timeout,
        },
        |key| std::env::var(key).ok(),
        &file,
    );
    tracing::info!(server = %settings.base_url, theme = %settings.theme, "starting");

    let api: Arc<dyn ReportApi> =
        Arc::new(HttpApi::new(settings.base_url.clone())?.with_timeout(settings.request_timeout));

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let cancel = CancellationToken::new();
    tokio::spawn(executor::run(api, cmd_rx, done_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(
        settings.base_url,
        settings.email,
        theme::Theme::from_name(&settings.theme),
    );
    app.start();

    let tick_rate = Duration::from_millis(100);

    loop {
        for cmd in app.drain_outbox() {
            tracing::debug!(op = cmd.op.name(), epoch = cmd.epoch, "dispatch");
            if cmd_tx.send(cmd).is_err() {
                tracing::warn!("executor stopped, dropping command");
            }
        }

        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_done = done_rx.recv() => {
                match maybe_done {
                    Some(done) => {
                        app.handle_completion(done);
                        while let Ok(more) = done_rx.try_recv() {
                            app.handle_completion(more);
                        }
                    }
                    None => {
                        // Executor gone; only the shutdown token ends it.
                        app.should_quit = true;
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, &app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    tracing::info!("exiting");

    Ok(())
}
