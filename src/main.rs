//! Binary entry point for `sigupd`.

use std::process;
use std::time::Duration;

use clap::Parser;

use sig_update_helper::cli_app::Cli;
use sig_update_helper::config::{self, ServiceConfig};
use sig_update_helper::core::errors::{Result, SuhError};
use sig_update_helper::daemon::loop_main::{self, LoopOptions};
use sig_update_helper::daemon::pidfile::PidFile;
use sig_update_helper::daemon::signals::ShutdownFlag;
use sig_update_helper::logger;
use sig_update_helper::notify::SignalNotifier;
use sig_update_helper::updater::cycle::Updater;
use sig_update_helper::updater::fetch::Endpoint;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        // Pid-file removal happens after the log sink is live and is
        // already reported there; everything else fails before the sink
        // exists and belongs on the terminal.
        if !matches!(err, SuhError::PidFileRemove { .. }) {
            eprintln!("ERROR: {err}");
        }
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let service = ServiceConfig::load(&cli.conf_file)?;
    config::ensure_target_dir(&service.target_dir, service.ownership)?;

    let pid_file = PidFile::write(&cli.pid_file)?;
    logger::init(&cli.log_file, cli.log_level)?;
    let shutdown = ShutdownFlag::install()?;

    let endpoint = Endpoint::new(cli.update_url.clone())?;
    let updater = Updater::new(
        endpoint,
        service.target_dir.clone(),
        &cli.engine_version,
        service.ownership,
    );
    let notifier = SignalNotifier::new(service.service_pid);

    let options = LoopOptions {
        interval: Duration::from_secs(cli.update_interval * 60),
        once: cli.once,
    };
    loop_main::run(&updater, &notifier, pid_file, &shutdown, options)
}
