//! Top-level CLI definition.

use std::path::PathBuf;

use clap::Parser;

use crate::logger::LogLevel;

/// Signature update helper: keeps a scanner's IDE files current and
/// tells the scanner to reload them.
#[derive(Debug, Parser)]
#[command(name = "sigupd", version, about)]
pub struct Cli {
    /// Engine version the scanner runs, e.g. 4.75 (4.75.0 shortens to 4.75).
    #[arg(long)]
    pub engine_version: String,

    /// Location of the scanner service's configuration file.
    #[arg(long, default_value = "/etc/savdi/savdid.conf")]
    pub conf_file: PathBuf,

    /// Base URL for downloading signature packages.
    #[arg(long, default_value = "http://www.sophos.com/downloads/ide/")]
    pub update_url: String,

    /// Interval (in minutes) to wake up and check for signature updates.
    #[arg(long, default_value_t = 15)]
    pub update_interval: u64,

    /// Full path where the updater stores its own pid file.
    #[arg(long, default_value = "/var/run/sigupd.pid")]
    pub pid_file: PathBuf,

    /// Path to the updater's log file.
    #[arg(long, default_value = "/var/log/sigupd.log")]
    pub log_file: PathBuf,

    /// Logging verbosity.
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Run a single update cycle and exit.
    #[arg(long)]
    pub once: bool,
}
