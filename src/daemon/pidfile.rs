//! Own pid-file lifecycle.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use crate::core::errors::{Result, SuhError};

/// Pid file advertising this daemon's process id. Written at startup and
/// removed explicitly at shutdown so a removal failure can surface its
/// own exit code.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Write the current process id to `path`.
    pub fn write(path: &Path) -> Result<Self> {
        fs::write(path, process::id().to_string()).map_err(|err| SuhError::PidFileWrite {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Remove the file. Consumes the handle; the daemon exits right
    /// after this call either way.
    pub fn remove(self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|err| SuhError::PidFileRemove {
            path: self.path.clone(),
            details: err.to_string(),
        })
    }

    /// Location of the pid file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
