//! `tracing` subscriber setup.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppError, EXIT_RUNTIME};

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// The TUI owns the terminal and no log file was requested.
    Off,
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "deposit_predictor=debug,info"
    } else {
        "deposit_predictor=info"
    }
}

pub fn init_logger(verbose: bool, target: &LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::new(EXIT_RUNTIME, format!("Failed to open log file '{}': {e}", path.display()))
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false)
                        .compact(),
                )
                .try_init()
        }
    };

    result.map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize logging: {e}")))
}
