//! Zip extraction for downloaded Terraform releases.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};
use zip::ZipArchive;

/// Extract every entry of the zip read from `reader` into `dest`.
///
/// Directory entries are recreated; files are written with the unix mode the
/// archive declares. Returns the extracted file paths in archive order.
#[instrument(skip_all, fields(dest = %dest.display()))]
pub fn extract_archive<R: Read + Seek>(reader: R, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = ZipArchive::new(reader).context("open zip archive")?;
    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("read zip entry {index}"))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| anyhow!("zip entry {:?} escapes the target directory", entry.name()))?;
        let path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&path)
                .with_context(|| format!("create directory {}", path.display()))?;
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let mut out = create_with_mode(&path, entry.unix_mode())?;
        let bytes = io::copy(&mut entry, &mut out)
            .with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), bytes, "extracted file");
        extracted.push(path);
    }

    Ok(extracted)
}

#[cfg(unix)]
fn create_with_mode(path: &Path, mode: Option<u32>) -> Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if let Some(mode) = mode {
        options.mode(mode & 0o777);
    }
    options
        .open(path)
        .with_context(|| format!("create {}", path.display()))
}

#[cfg(not(unix))]
fn create_with_mode(path: &Path, _mode: Option<u32>) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("create {}", path.display()))
}

/// Mark `path` executable (0755).
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod {}", path.display()))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
