//! SUH-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SuhError>;

/// Top-level error type for the signature update helper.
///
/// Fatal startup errors carry a distinct process exit code; cycle errors
/// are transient and only abandon the current update run.
#[derive(Debug, Error)]
pub enum SuhError {
    #[error("[SUH-1001] could not read service config file {path}: {details}")]
    ConfigRead { path: PathBuf, details: String },

    #[error("[SUH-1002] could not locate '{directive}' directive in service config file {path}")]
    MissingDirective {
        directive: &'static str,
        path: PathBuf,
    },

    #[error("[SUH-1003] could not read service pid file {path}: {details}")]
    ServicePid { path: PathBuf, details: String },

    #[error("[SUH-1101] could not find user '{name}'")]
    UnknownUser { name: String },

    #[error("[SUH-1102] could not find group '{name}'")]
    UnknownGroup { name: String },

    #[error("[SUH-1201] could not create signature directory {path}: {details}")]
    TargetDir { path: PathBuf, details: String },

    #[error("[SUH-1301] could not write own pid file {path}: {details}")]
    PidFileWrite { path: PathBuf, details: String },

    #[error("[SUH-1302] could not remove own pid file {path}: {details}")]
    PidFileRemove { path: PathBuf, details: String },

    #[error("[SUH-1901] startup failure: {details}")]
    Bootstrap { details: String },

    #[error("[SUH-2001] could not fetch {resource}: {details}")]
    Fetch { resource: String, details: String },

    #[error("[SUH-2002] could not unpack {resource}: {details}")]
    Unpack { resource: String, details: String },

    #[error("[SUH-2003] could not notify service ({target}): {details}")]
    Notify { target: String, details: String },

    #[error("[SUH-2004] could not access revision marker {path}: {details}")]
    Marker { path: PathBuf, details: String },
}

impl SuhError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => "SUH-1001",
            Self::MissingDirective { .. } => "SUH-1002",
            Self::ServicePid { .. } => "SUH-1003",
            Self::UnknownUser { .. } => "SUH-1101",
            Self::UnknownGroup { .. } => "SUH-1102",
            Self::TargetDir { .. } => "SUH-1201",
            Self::PidFileWrite { .. } => "SUH-1301",
            Self::PidFileRemove { .. } => "SUH-1302",
            Self::Bootstrap { .. } => "SUH-1901",
            Self::Fetch { .. } => "SUH-2001",
            Self::Unpack { .. } => "SUH-2002",
            Self::Notify { .. } => "SUH-2003",
            Self::Marker { .. } => "SUH-2004",
        }
    }

    /// Whether the error abandons only the current update run. Transient
    /// errors are logged and retried on the next wake-up; everything else
    /// terminates the process.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Unpack { .. } | Self::Notify { .. } | Self::Marker { .. }
        )
    }

    /// Process exit code for the fatal tier. Each startup failure class
    /// has its own small negative code; transient errors never terminate
    /// the process and fall back to a generic nonzero code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigRead { .. } | Self::ServicePid { .. } => -1,
            Self::MissingDirective { .. } => -2,
            Self::UnknownUser { .. } | Self::UnknownGroup { .. } => -3,
            Self::TargetDir { .. } => -4,
            Self::PidFileWrite { .. } => -5,
            Self::PidFileRemove { .. } => -6,
            Self::Bootstrap { .. } => -7,
            Self::Fetch { .. } | Self::Unpack { .. } | Self::Notify { .. } | Self::Marker { .. } => 1,
        }
    }
}
