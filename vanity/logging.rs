use std::{fs::OpenOptions, io, path::Path, str::FromStr, sync::Mutex};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use crate::error::ConfigError;

/// Initialize logging to stderr and optionally to a file.
///
/// Matches are written to stdout, so logs stay on stderr. The level comes
/// from `RUST_LOG` and defaults to "info".
pub fn init_logging(log_file: Option<&Path>) -> Result<(), ConfigError> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = match LevelFilter::from_str(&rust_log) {
        Ok(level) => EnvFilter::new(level.to_string()),
        Err(_) => EnvFilter::try_new(&rust_log).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer().with_writer(io::stderr);
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|error| {
                    ConfigError::Crate("log file", format!("{}: {}", path.display(), error))
                })?;
            let file_layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            Box::new(
                Registry::default()
                    .with(env_filter)
                    .with(stderr_layer)
                    .with(file_layer),
            )
        }
        None => Box::new(Registry::default().with(env_filter).with(stderr_layer)),
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|error| ConfigError::Crate("tracing", error.to_string()))
}
