//! File-backed logging: plain-text records appended to the configured sink.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

use crate::core::errors::{Result, SuhError};

/// Verbosity levels accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogLevel {
    /// Per-step detail, including marker reads and remote lookups.
    Debug,
    /// Update-run progress and outcomes.
    Info,
    /// Suspicious but recoverable conditions only.
    Warning,
    /// Failed update runs only.
    Error,
}

impl LogLevel {
    /// Maximum level recorded by the subscriber.
    #[must_use]
    pub const fn as_level(self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// Install the global log sink, appending to `log_file`.
///
/// Startup diagnostics go to stderr before this point; once the
/// subscriber is installed, runtime reporting goes to the file only.
pub fn init(log_file: &Path, level: LogLevel) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|err| SuhError::Bootstrap {
            details: format!("could not open log file {}: {err}", log_file.display()),
        })?;

    tracing_subscriber::fmt()
        .with_max_level(level.as_level())
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file))
        .try_init()
        .map_err(|err| SuhError::Bootstrap {
            details: format!("could not install log subscriber: {err}"),
        })
}
