//! Host platform and Terraform release naming.
//!
//! The host is described with Rust target names. Only the download needs the
//! HashiCorp release names, so an unmapped OS or architecture fails there and
//! nowhere else.

use anyhow::{Result, bail};

/// Host operating system and CPU architecture, as `std::env::consts` names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

/// OS and architecture in release archive naming (`darwin`, `amd64`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub const fn new(os: &'static str, arch: &'static str) -> Self {
        Self { os, arch }
    }

    /// Platform of the running binary.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// File name of the Terraform binary on this platform.
    pub fn executable_name(&self) -> &'static str {
        if self.is_windows() {
            "terraform.exe"
        } else {
            "terraform"
        }
    }

    /// Release naming for this platform. Errors when no release is published for it.
    pub fn release_target(&self) -> Result<ReleaseTarget> {
        let os = match self.os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            "freebsd" => "freebsd",
            "openbsd" => "openbsd",
            "solaris" => "solaris",
            other => bail!("unsupported operating system {other}"),
        };
        let arch = match self.arch {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "arm" => "arm",
            other => bail!("unsupported architecture {other}"),
        };
        Ok(ReleaseTarget { os, arch })
    }
}

/// Release archive URL for `version` on `platform`.
pub fn download_url(version: &str, platform: &Platform) -> Result<String> {
    let target = platform.release_target()?;
    Ok(format!(
        "https://releases.hashicorp.com/terraform/{version}/terraform_{version}_{}_{}.zip",
        target.os, target.arch
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rust_names_to_release_names() {
        let target = Platform::new("macos", "aarch64").release_target().expect("target");
        assert_eq!(target, ReleaseTarget { os: "darwin", arch: "arm64" });

        let target = Platform::new("windows", "x86").release_target().expect("target");
        assert_eq!(target, ReleaseTarget { os: "windows", arch: "386" });
    }

    #[test]
    fn unknown_targets_have_no_release() {
        let err = Platform::new("netbsd", "x86_64").release_target().unwrap_err();
        assert!(err.to_string().contains("unsupported operating system netbsd"));
        for arch in ["riscv64", "s390x", "powerpc64"] {
            let err = Platform::new("linux", arch).release_target().unwrap_err();
            assert!(err.to_string().contains(&format!("unsupported architecture {arch}")));
        }
    }

    #[test]
    fn unknown_targets_still_name_the_executable() {
        let platform = Platform::new("linux", "s390x");
        assert_eq!(platform.executable_name(), "terraform");
        assert!(!platform.is_windows());
    }

    #[test]
    fn executable_name_has_exe_suffix_on_windows() {
        assert_eq!(Platform::new("windows", "x86_64").executable_name(), "terraform.exe");
        assert_eq!(Platform::new("linux", "x86_64").executable_name(), "terraform");
    }

    #[test]
    fn download_url_is_templated_by_version_and_platform() {
        assert_eq!(
            download_url("1.9.8", &Platform::new("linux", "x86_64")).expect("url"),
            "https://releases.hashicorp.com/terraform/1.9.8/terraform_1.9.8_linux_amd64.zip"
        );
        assert!(download_url("1.9.8", &Platform::new("linux", "riscv64")).is_err());
    }
}
