use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Initializes logging with a compact stderr layer and a daily JSON file.
///
/// Stdout is left for extracted records. The returned guard must be held
/// until exit so buffered file logs are flushed.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Option<WorkerGuard> {
    let default_directive = if verbose {
        "watch_scraper=debug"
    } else {
        "watch_scraper=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // File logging is best effort; an unwritable directory leaves console only.
    let (file_layer, guard) = match fs::create_dir_all(&config.directory) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
