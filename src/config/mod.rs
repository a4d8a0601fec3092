//! Service configuration: directive parsing, account resolution, target
//! directory preparation.
//!
//! The config file belongs to the scanner service, not to this daemon; we
//! scan it for the four directives we need and leave the rest alone.

use std::fs;
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Group, Uid, User, chown};
use regex::Regex;

use crate::core::errors::{Result, SuhError};

/// Raw directives extracted from the scanner service's config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    /// Pid file the scanner writes for itself.
    pub pid_file: PathBuf,
    /// Directory the scanner reads signature files from.
    pub ide_dir: PathBuf,
    /// Account name the scanner runs as.
    pub user: String,
    /// Group name the scanner runs as.
    pub group: String,
}

impl Directives {
    /// Scan `path` for the required directives. Leading whitespace before
    /// a directive is tolerated and the last occurrence wins.
    pub fn parse(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| SuhError::ConfigRead {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;

        let directive = Regex::new(r"^\s*(pidfile|idedir|user|group):\s*(.*)").map_err(|err| {
            SuhError::Bootstrap {
                details: format!("could not compile directive pattern: {err}"),
            }
        })?;

        let mut pid_file = None;
        let mut ide_dir = None;
        let mut user = None;
        let mut group = None;

        for line in text.lines() {
            if let Some(caps) = directive.captures(line) {
                let value = caps[2].trim_end();
                match &caps[1] {
                    "pidfile" => pid_file = Some(PathBuf::from(value)),
                    "idedir" => ide_dir = Some(PathBuf::from(value)),
                    "user" => user = Some(value.to_string()),
                    "group" => group = Some(value.to_string()),
                    _ => {}
                }
            }
        }

        let missing = |directive: &'static str| SuhError::MissingDirective {
            directive,
            path: path.to_path_buf(),
        };
        Ok(Self {
            pid_file: pid_file.ok_or_else(|| missing("pidfile"))?,
            ide_dir: ide_dir.ok_or_else(|| missing("idedir"))?,
            user: user.ok_or_else(|| missing("user"))?,
            group: group.ok_or_else(|| missing("group"))?,
        })
    }
}

/// Resolved service account identity; everything written under the
/// signature directory is handed to this account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    /// Owning user id.
    pub uid: Uid,
    /// Owning group id.
    pub gid: Gid,
}

impl Ownership {
    /// Look up `user` and `group` in the system account databases.
    pub fn resolve(user: &str, group: &str) -> Result<Self> {
        let uid = User::from_name(user)
            .ok()
            .flatten()
            .ok_or_else(|| SuhError::UnknownUser {
                name: user.to_string(),
            })?
            .uid;
        let gid = Group::from_name(group)
            .ok()
            .flatten()
            .ok_or_else(|| SuhError::UnknownGroup {
                name: group.to_string(),
            })?
            .gid;
        Ok(Self { uid, gid })
    }
}

/// Startup configuration resolved once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Pid of the scanner process to signal after updates.
    pub service_pid: i32,
    /// Directory receiving extracted signature files and the marker.
    pub target_dir: PathBuf,
    /// Account that must own everything written under `target_dir`.
    pub ownership: Ownership,
}

impl ServiceConfig {
    /// Read the config file, the collaborating pid file, and resolve the
    /// service account. Any failure here is fatal for startup.
    pub fn load(conf_path: &Path) -> Result<Self> {
        let directives = Directives::parse(conf_path)?;

        let pid_text =
            fs::read_to_string(&directives.pid_file).map_err(|err| SuhError::ServicePid {
                path: directives.pid_file.clone(),
                details: err.to_string(),
            })?;
        let service_pid = pid_text
            .trim()
            .parse::<i32>()
            .map_err(|err| SuhError::ServicePid {
                path: directives.pid_file.clone(),
                details: err.to_string(),
            })?;

        let ownership = Ownership::resolve(&directives.user, &directives.group)?;

        Ok(Self {
            service_pid,
            target_dir: directives.ide_dir,
            ownership,
        })
    }
}

/// Create the signature directory if it does not exist and hand it to the
/// service account.
pub fn ensure_target_dir(dir: &Path, ownership: Ownership) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir(dir).map_err(|err| SuhError::TargetDir {
        path: dir.to_path_buf(),
        details: err.to_string(),
    })?;
    chown(dir, Some(ownership.uid), Some(ownership.gid)).map_err(|err| SuhError::TargetDir {
        path: dir.to_path_buf(),
        details: err.to_string(),
    })
}
