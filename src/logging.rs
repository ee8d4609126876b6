//! Tracing subscriber setup.
//!
//! The filter comes from `RUST_LOG` (default `info`). The interactive
//! dashboard owns the terminal, so it logs to a file instead of stderr.

use std::fs::{OpenOptions, create_dir_all};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_FILTER: &str = "info";

/// Default log file used by the TUI.
pub fn default_log_file() -> PathBuf {
    PathBuf::from("logs").join("autodash.log")
}

#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Call once, from the binary.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                create_dir_all(dir)
                    .map_err(|e| AppError::new(4, format!("Failed to create log dir '{}': {e}", dir.display())))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::new(4, format!("Failed to open log file '{}': {e}", path.display())))?;

            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    result.map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}
