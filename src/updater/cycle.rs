//! Check/apply orchestration for one update cycle.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Ownership;
use crate::core::errors::Result;
use crate::notify::Notifier;
use crate::updater::fetch::Endpoint;
use crate::updater::{revision, unpack};

/// One fully configured update pipeline against a single endpoint and
/// signature directory.
pub struct Updater {
    endpoint: Endpoint,
    target_dir: PathBuf,
    package_version: String,
    ownership: Ownership,
}

impl Updater {
    /// `engine_version` is normalized once here (`4.75.0` becomes `475`).
    #[must_use]
    pub fn new(
        endpoint: Endpoint,
        target_dir: PathBuf,
        engine_version: &str,
        ownership: Ownership,
    ) -> Self {
        Self {
            endpoint,
            target_dir,
            package_version: revision::normalize_version(engine_version),
            ownership,
        }
    }

    /// Compare the local marker against the published one. Read-only; a
    /// fetch failure abandons the cycle rather than reading as
    /// "up to date".
    pub fn check_for_update(&self) -> Result<bool> {
        let local = revision::read_marker(&self.target_dir)?;
        debug!("local signature revision: '{local}'");

        debug!(
            "retrieving remote signature revision ({})",
            self.endpoint.revision_url()
        );
        let remote = self.endpoint.revision()?;
        debug!("remote signature revision: '{remote}'");

        if remote == local {
            info!("current signature files are up-to-date. rev: {remote}");
            Ok(false)
        } else {
            info!("new signature package available. rev: {remote}");
            Ok(true)
        }
    }

    /// Download, unpack, notify, then persist the marker. Strictly
    /// ordered; the first failing step aborts the update and leaves the
    /// marker untouched, so the next cycle retries the same revision.
    pub fn apply_update(&self, notifier: &dyn Notifier) -> Result<()> {
        // Re-fetched rather than reused from the check step: a remote
        // revision published in between is the one persisted below.
        debug!(
            "retrieving remote signature revision ({})",
            self.endpoint.revision_url()
        );
        let remote = self.endpoint.revision()?;

        let package_url = self.endpoint.package_url(&self.package_version);
        info!("retrieving new signature package ({package_url})");
        let package = self.endpoint.package(&self.package_version)?;

        info!(
            "unpacking new signatures ({remote}) into {}",
            self.target_dir.display()
        );
        unpack::extract_package(&package, &package_url, &self.target_dir, self.ownership)?;

        info!("sending reload signal to service ({})", notifier.target());
        notifier.notify()?;

        debug!("updating local signature revision marker");
        revision::write_marker(&self.target_dir, &remote)?;

        Ok(())
    }

    /// One cycle: check, then apply when the markers differ.
    pub fn run_cycle(&self, notifier: &dyn Notifier) -> Result<()> {
        if self.check_for_update()? {
            self.apply_update(notifier)?;
        }
        Ok(())
    }

    /// Directory receiving extracted packages and the marker file.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }
}
