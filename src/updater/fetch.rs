//! Remote endpoint access with bounded waits.

use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::core::errors::{Result, SuhError};
use crate::updater::revision;

/// Resource name of the published revision marker.
pub const REVISION_RESOURCE: &str = "ide_dgst.txt";

/// Suffix appended to the normalized engine version to name a package.
pub const PACKAGE_SUFFIX: &str = "_ides.zip";

/// Timeout for the small revision resource.
pub const REVISION_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a full package download.
pub const PACKAGE_TIMEOUT: Duration = Duration::from_secs(300);

const USER_AGENT: &str = concat!("sigupd/", env!("CARGO_PKG_VERSION"));

/// Distribution endpoint rooted at a base URL. Resource URLs are built
/// by direct concatenation, so the base is expected to end with `/`.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    client: Client,
}

impl Endpoint {
    /// Build the endpoint and its HTTP client.
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| SuhError::Bootstrap {
                details: format!("could not build HTTP client: {err}"),
            })?;
        Ok(Self { base_url, client })
    }

    /// URL of the revision marker resource.
    #[must_use]
    pub fn revision_url(&self) -> String {
        format!("{}{REVISION_RESOURCE}", self.base_url)
    }

    /// URL of the package archive for a normalized engine version.
    #[must_use]
    pub fn package_url(&self, version: &str) -> String {
        format!("{}{version}{PACKAGE_SUFFIX}", self.base_url)
    }

    /// Fetch the published revision marker, stripped of its line
    /// terminator. A non-success status is a fetch failure, never
    /// "no update available".
    pub fn revision(&self) -> Result<String> {
        let url = self.revision_url();
        let text = self
            .client
            .get(&url)
            .timeout(REVISION_TIMEOUT)
            .send()
            .and_then(Response::error_for_status)
            .and_then(|response| response.text())
            .map_err(|err| SuhError::Fetch {
                resource: url,
                details: err.to_string(),
            })?;
        Ok(revision::trim_remote(&text))
    }

    /// Download the package archive for `version` into memory. The
    /// archive lives only for the duration of one update cycle.
    pub fn package(&self, version: &str) -> Result<Vec<u8>> {
        let url = self.package_url(version);
        let bytes = self
            .client
            .get(&url)
            .timeout(PACKAGE_TIMEOUT)
            .send()
            .and_then(Response::error_for_status)
            .and_then(|response| response.bytes())
            .map_err(|err| SuhError::Fetch {
                resource: url,
                details: err.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}
