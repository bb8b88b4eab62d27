use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the file writer alive. Dropping it flushes buffered log lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: PathBuf,
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// With a log file configured, events are written there as JSON lines and a
/// guard is returned. Otherwise compact text goes to stderr so it never mixes
/// with the table output on stdout.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>> {
    let level = logging.level().unwrap_or(Level::WARN);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let Some(log_path) = logging.file.clone() else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .compact()
            .with_writer(std::io::stderr)
            .finish();
        // Already installed when several sessions share a process.
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(None);
    };

    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file at {}", log_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        log_path,
    }))
}
