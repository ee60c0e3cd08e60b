use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::DEFAULT_LOG_FILTER;

/// Initialise the global tracing subscriber.
///
/// Diagnostics go to stderr and, as JSON, to a daily log file; stdout is left
/// for the report. `RUST_LOG` wins over `logging.filter`. Returns a
/// [`WorkerGuard`] that **must** be held for the lifetime of the process;
/// dropping it flushes and closes the file writer.
pub fn init_tracing(logging: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&logging.log_dir)
        .with_context(|| format!("creating log dir {}", logging.log_dir))?;

    let file_appender = tracing_appender::rolling::daily(&logging.log_dir, &logging.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.filter)
            .with_context(|| format!("invalid logging.filter '{}'", logging.filter))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .json(),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();

    Ok(guard)
}

/// Stderr-only subscriber for the window before the config is loaded.
///
/// Use with [`tracing::subscriber::with_default`] around config loading so
/// env-override notes are not lost.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    stderr_subscriber(std::io::stderr, filter)
}

pub(crate) fn stderr_subscriber<W>(writer: W, filter: EnvFilter) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .compact()
        .finish()
}
