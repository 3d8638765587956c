use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Routes tracing output to a daily log file, since the terminal belongs to
/// the UI. `RUST_LOG` overrides `level`. Keep the guard alive until exit.
pub fn init(level: &str) -> Result<WorkerGuard> {
    let log_dir = dirs::data_local_dir()
        .context("Could not find data directory")?
        .join("playchrome")
        .join("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(&log_dir, "playchrome.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(guard)
}
