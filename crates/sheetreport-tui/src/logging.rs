use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "sheetreport=info";
const LOG_FILE_PREFIX: &str = "sheetreport-tui.log";

/// `<cache_dir>/sheetreport`, where the rolling log files live.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("sheetreport"))
}

/// Send tracing output to a daily-rolling file; the terminal belongs to the
/// UI. `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the life of the process so buffered lines are flushed.
pub fn init_logging(dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(guard)
}
