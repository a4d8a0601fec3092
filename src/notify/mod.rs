//! Collaborator notification: tells the scanner process to pick up the
//! freshly unpacked signature files.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::core::errors::{Result, SuhError};

/// Capability to nudge the collaborating service after an update lands.
///
/// Delivery must not block indefinitely; a failure is reported by the
/// caller and never terminates the daemon.
pub trait Notifier {
    /// Deliver the reload notification.
    fn notify(&self) -> Result<()>;

    /// Identity of the target, for log lines.
    fn target(&self) -> String;
}

/// Production notifier: SIGHUP to the scanner's pid.
///
/// The pid is read once at startup and not re-validated per cycle; a
/// stale pid surfaces here as a delivery failure.
#[derive(Debug, Clone, Copy)]
pub struct SignalNotifier {
    pid: Pid,
}

impl SignalNotifier {
    /// Target the given raw pid.
    #[must_use]
    pub fn new(pid: i32) -> Self {
        Self {
            pid: Pid::from_raw(pid),
        }
    }
}

impl Notifier for SignalNotifier {
    fn notify(&self) -> Result<()> {
        kill(self.pid, Signal::SIGHUP).map_err(|err| SuhError::Notify {
            target: self.pid.to_string(),
            details: err.to_string(),
        })
    }

    fn target(&self) -> String {
        self.pid.to_string()
    }
}
