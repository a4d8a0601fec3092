//! Revision marker bookkeeping for the signature directory.
//!
//! The marker is the only durable state the daemon owns. It records the
//! last *successfully* applied revision and is advanced in a single
//! whole-file write, never speculatively.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::core::errors::{Result, SuhError};

/// Marker file kept next to the extracted signature files.
pub const MARKER_FILE: &str = "ide.rev";

/// Read the locally recorded revision. A missing marker reads as the
/// empty string so a fresh directory always looks out of date.
pub fn read_marker(dir: &Path) -> Result<String> {
    let path = dir.join(MARKER_FILE);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(SuhError::Marker {
            path,
            details: err.to_string(),
        }),
    }
}

/// Replace the marker with `revision` in one whole-file write.
pub fn write_marker(dir: &Path, revision: &str) -> Result<()> {
    let path = dir.join(MARKER_FILE);
    fs::write(&path, revision).map_err(|err| SuhError::Marker {
        path,
        details: err.to_string(),
    })
}

/// Strip the line terminator from the remote revision resource. The
/// marker file is written without one, so local and remote values
/// compare byte-for-byte.
#[must_use]
pub fn trim_remote(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n']).to_string()
}

/// Build the package name fragment for an engine version: a trailing
/// `.0` patch segment is dropped, then the remaining separators are
/// removed. `4.75.0` and `4.75` both become `475`.
#[must_use]
pub fn normalize_version(version: &str) -> String {
    let short = version.strip_suffix(".0").unwrap_or(version);
    short.chars().filter(|c| *c != '.').collect()
}
