//! The sequential poll loop: one cycle, then sleep, repeated until
//! termination is requested.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::core::errors::Result;
use crate::daemon::pidfile::PidFile;
use crate::daemon::signals::ShutdownFlag;
use crate::notify::Notifier;
use crate::updater::cycle::Updater;

/// Loop pacing and mode.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Sleep between cycles.
    pub interval: Duration,
    /// Run a single cycle and shut down (test mode).
    pub once: bool,
}

/// Run cycles until termination is requested, then remove the pid file.
/// A failed cycle is logged and retried on the next wake-up; a pid-file
/// removal failure is the only error path out.
pub fn run(
    updater: &Updater,
    notifier: &dyn Notifier,
    pid_file: PidFile,
    shutdown: &ShutdownFlag,
    options: LoopOptions,
) -> Result<()> {
    info!("starting signature update helper");

    loop {
        info!("---------STARTING UPDATE RUN---------");
        if let Err(err) = updater.run_cycle(notifier) {
            error!("update run failed: {err}");
        }
        info!("---------ENDING UPDATE RUN---------");

        if options.once || shutdown.is_set() {
            break;
        }

        info!("sleeping for {} minute(s)", options.interval.as_secs() / 60);
        if shutdown.sleep_interruptibly(options.interval) {
            break;
        }
    }

    info!("shutting down");
    debug!("removing pid file {}", pid_file.path().display());
    pid_file.remove().inspect_err(|err| error!("{err}"))
}
