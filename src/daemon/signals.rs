//! Termination handling: SIGTERM and SIGINT trip an atomic flag that the
//! loop observes between blocking calls, never mid-step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use signal_hook::consts::{SIGINT, SIGTERM};

use crate::core::errors::{Result, SuhError};

/// How often a sleeping loop re-checks the flag.
const WAKE_SLICE: Duration = Duration::from_millis(250);

/// Shared shutdown flag set from the signal handlers.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Register handlers for SIGTERM and SIGINT.
    pub fn install() -> Result<Self> {
        let flag = Arc::new(AtomicBool::new(false));
        for signal in [SIGTERM, SIGINT] {
            signal_hook::flag::register(signal, Arc::clone(&flag)).map_err(|err| {
                SuhError::Bootstrap {
                    details: format!("could not register handler for signal {signal}: {err}"),
                }
            })?;
        }
        Ok(Self { flag })
    }

    /// Flag without registered handlers, for driving the loop in tests.
    #[must_use]
    pub fn unregistered() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether termination has been requested.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request termination, as a handler would.
    pub fn trip(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Sleep for `duration` in short slices, returning early when the
    /// flag is tripped. Returns true when interrupted.
    pub fn sleep_interruptibly(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_set() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            std::thread::sleep(remaining.min(WAKE_SLICE));
        }
    }
}
