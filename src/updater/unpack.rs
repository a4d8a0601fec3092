//! Package extraction into the signature directory.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use nix::unistd::chown;
use zip::ZipArchive;

use crate::config::Ownership;
use crate::core::errors::{Result, SuhError};

/// Unpack an in-memory ZIP package into `target_dir`, handing every
/// extracted entry to the service account. Entry names that would escape
/// `target_dir` are skipped. Returns the paths written, in archive order.
pub fn extract_package(
    bytes: &[u8],
    resource: &str,
    target_dir: &Path,
    ownership: Ownership,
) -> Result<Vec<PathBuf>> {
    let unpack_err = |details: String| SuhError::Unpack {
        resource: resource.to_string(),
        details,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|err| unpack_err(err.to_string()))?;
    let mut extracted = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| unpack_err(err.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let outpath = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|err| unpack_err(err.to_string()))?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).map_err(|err| unpack_err(err.to_string()))?;
            }
            let mut outfile =
                fs::File::create(&outpath).map_err(|err| unpack_err(err.to_string()))?;
            io::copy(&mut entry, &mut outfile).map_err(|err| unpack_err(err.to_string()))?;
        }

        chown(&outpath, Some(ownership.uid), Some(ownership.gid))
            .map_err(|err| unpack_err(format!("chown {}: {err}", outpath.display())))?;
        extracted.push(outpath);
    }

    Ok(extracted)
}
