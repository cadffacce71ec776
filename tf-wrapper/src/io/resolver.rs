//! Locate the Terraform executable, downloading it when missing.
//!
//! Lookup order: search path, then the working directory, then a fresh
//! download of the pinned release unzipped into the working directory. The
//! fetcher and the release URL are only built when the download is needed.

use std::ffi::{OsStr, OsString};
use std::io::Seek;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::platform::{Platform, download_url};
use crate::io::archive::{extract_archive, make_executable};
use crate::io::download::Fetcher;

/// How the executable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableSource {
    SearchPath,
    WorkingDir,
    Downloaded,
}

/// Resolved Terraform program. Resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable {
    pub program: PathBuf,
    pub source: ExecutableSource,
}

/// Parameters for resolving the executable.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Directory searched second and used as the download target.
    /// `.` yields `./terraform` style program paths.
    pub workdir: PathBuf,
    /// Search path in `PATH` syntax. `None` skips the search-path lookup.
    pub search_path: Option<OsString>,
    pub platform: Platform,
    /// Release version to download.
    pub version: String,
}

/// Find or provision the executable according to `request`.
///
/// `make_fetcher` runs only when neither lookup finds the executable.
#[instrument(skip_all, fields(workdir = %request.workdir.display(), version = %request.version))]
pub fn resolve_executable<F, M>(request: &ResolveRequest, make_fetcher: M) -> Result<Executable>
where
    F: Fetcher,
    M: FnOnce() -> Result<F>,
{
    let name = request.platform.executable_name();

    if let Some(path) = find_on_search_path(request, name) {
        println!("Terraform found in PATH.");
        debug!(program = %path.display(), "found on search path");
        return Ok(Executable {
            program: path,
            source: ExecutableSource::SearchPath,
        });
    }

    let local = request.workdir.join(name);
    if local.is_file() {
        println!("Terraform executable found in the current directory.");
        debug!(program = %local.display(), "found in working directory");
        return Ok(Executable {
            program: local,
            source: ExecutableSource::WorkingDir,
        });
    }

    println!("Terraform not found in PATH or current directory. Downloading...");
    let program = download_and_extract(request, make_fetcher, name)
        .context("failed to download Terraform")?;
    Ok(Executable {
        program,
        source: ExecutableSource::Downloaded,
    })
}

fn find_on_search_path(request: &ResolveRequest, name: &str) -> Option<PathBuf> {
    let paths = request.search_path.as_ref()?;
    which::which_in(name, Some(paths), &request.workdir).ok()
}

fn download_and_extract<F, M>(
    request: &ResolveRequest,
    make_fetcher: M,
    name: &str,
) -> Result<PathBuf>
where
    F: Fetcher,
    M: FnOnce() -> Result<F>,
{
    let url = download_url(&request.version, &request.platform)?;
    let fetcher = make_fetcher()?;
    let mut archive = tempfile::Builder::new()
        .prefix("terraform")
        .suffix(".zip")
        .tempfile_in(&request.workdir)
        .with_context(|| format!("create archive file in {}", request.workdir.display()))?;

    let bytes = fetcher.fetch(&url, archive.as_file_mut())?;
    info!(url = %url, bytes, "downloaded archive");
    println!("Downloaded {bytes} bytes from {url}");

    archive
        .as_file_mut()
        .rewind()
        .context("rewind downloaded archive")?;
    let files = extract_archive(archive.as_file_mut(), &request.workdir)?;
    archive.close().context("remove downloaded archive")?;

    let program = files
        .into_iter()
        .find(|path| path.file_name() == Some(OsStr::new(name)))
        .ok_or_else(|| anyhow!("archive from {url} does not contain {name}"))?;
    if !request.platform.is_windows() {
        make_executable(&program)?;
    }
    debug!(program = %program.display(), "extracted executable");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeFetcher, ZipEntry, zip_bytes};
    use anyhow::bail;
    use std::fs;

    fn linux() -> Platform {
        Platform::new("linux", "x86_64")
    }

    fn no_download() -> Result<&'static FakeFetcher> {
        bail!("fetcher should not be built")
    }

    fn request(workdir: &std::path::Path, search_path: Option<OsString>) -> ResolveRequest {
        ResolveRequest {
            workdir: workdir.to_path_buf(),
            search_path,
            platform: linux(),
            version: "1.9.8".to_string(),
        }
    }

    fn release_zip() -> Vec<u8> {
        zip_bytes(&[
            ZipEntry::file("LICENSE.txt", b"license", 0o644),
            ZipEntry::file("terraform", b"binary", 0o644),
        ])
    }

    fn archives_left(dir: &std::path::Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").path())
            .filter(|path| path.extension() == Some(OsStr::new("zip")))
            .collect()
    }

    #[test]
    fn prefers_working_directory_over_download() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("terraform"), b"local").expect("write");

        let exe = resolve_executable(&request(temp.path(), None), no_download).expect("resolve");

        assert_eq!(exe.source, ExecutableSource::WorkingDir);
        assert_eq!(exe.program, temp.path().join("terraform"));
    }

    #[test]
    fn unreleased_platform_uses_working_directory_copy() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("terraform"), b"local").expect("write");
        let req = ResolveRequest {
            platform: Platform::new("linux", "s390x"),
            ..request(temp.path(), None)
        };

        let exe = resolve_executable(&req, no_download).expect("resolve");
        assert_eq!(exe.source, ExecutableSource::WorkingDir);
    }

    #[test]
    fn unreleased_platform_fails_only_when_download_is_needed() {
        let temp = tempfile::tempdir().expect("tempdir");
        let req = ResolveRequest {
            platform: Platform::new("netbsd", "x86_64"),
            ..request(temp.path(), None)
        };

        let err = resolve_executable(&req, no_download).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to download Terraform"));
        assert!(message.contains("unsupported operating system netbsd"));
        assert!(archives_left(temp.path()).is_empty());
    }

    #[test]
    fn dot_workdir_yields_relative_prefix() {
        let req = ResolveRequest {
            workdir: PathBuf::from("."),
            search_path: None,
            platform: linux(),
            version: "1.9.8".to_string(),
        };
        let local = req.workdir.join(req.platform.executable_name());
        assert_eq!(local, PathBuf::from("./terraform"));
    }

    #[cfg(unix)]
    #[test]
    fn prefers_search_path_over_working_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bin = temp.path().join("bin");
        fs::create_dir(&bin).expect("mkdir");
        let on_path = crate::test_support::write_fake_terraform(&bin);
        let workdir = temp.path().join("work");
        fs::create_dir(&workdir).expect("mkdir");
        fs::write(workdir.join("terraform"), b"local").expect("write");

        let req = request(&workdir, Some(bin.into_os_string()));
        let exe = resolve_executable(&req, no_download).expect("resolve");

        assert_eq!(exe.source, ExecutableSource::SearchPath);
        assert_eq!(exe.program, on_path);
    }

    #[cfg(unix)]
    #[test]
    fn unreleased_architecture_still_finds_search_path_copy() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bin = temp.path().join("bin");
        fs::create_dir(&bin).expect("mkdir");
        let on_path = crate::test_support::write_fake_terraform(&bin);
        let req = ResolveRequest {
            platform: Platform::new("linux", "powerpc64"),
            ..request(temp.path(), Some(bin.into_os_string()))
        };

        let exe = resolve_executable(&req, no_download).expect("resolve");

        assert_eq!(exe.source, ExecutableSource::SearchPath);
        assert_eq!(exe.program, on_path);
    }

    #[test]
    fn downloads_and_extracts_when_missing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let empty = tempfile::tempdir().expect("tempdir");
        let fetcher = FakeFetcher::new(release_zip());

        let req = request(temp.path(), Some(empty.path().as_os_str().to_os_string()));
        let exe = resolve_executable(&req, || Ok(&fetcher)).expect("resolve");

        assert_eq!(exe.source, ExecutableSource::Downloaded);
        assert_eq!(exe.program, temp.path().join("terraform"));
        assert_eq!(
            fetcher.requested(),
            ["https://releases.hashicorp.com/terraform/1.9.8/terraform_1.9.8_linux_amd64.zip"]
        );
        assert_eq!(fs::read(&exe.program).expect("read"), b"binary");
        assert!(temp.path().join("LICENSE.txt").is_file());
        assert!(archives_left(temp.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn downloaded_binary_is_made_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = FakeFetcher::new(release_zip());
        let exe =
            resolve_executable(&request(temp.path(), None), || Ok(&fetcher)).expect("resolve");
        let mode = fs::metadata(&exe.program)
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn archive_without_executable_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = FakeFetcher::new(zip_bytes(&[ZipEntry::file("README", b"x", 0o644)]));

        let err = resolve_executable(&request(temp.path(), None), || Ok(&fetcher)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("failed to download Terraform"));
        assert!(message.contains("does not contain terraform"));
    }

    #[test]
    fn fetch_failure_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = FakeFetcher::failing("connection refused");

        let err = resolve_executable(&request(temp.path(), None), || Ok(&fetcher)).unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
        assert!(archives_left(temp.path()).is_empty());
    }

    #[test]
    fn malformed_download_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fetcher = FakeFetcher::new(b"<html>not found</html>".to_vec());

        let err = resolve_executable(&request(temp.path(), None), || Ok(&fetcher)).unwrap_err();
        assert!(format!("{err:#}").contains("open zip archive"));
    }
}
