//! Environment gating and cache directory setup.
//!
//! Binary downloading only makes sense for official prebuilt releases on
//! supported platforms. Every other situation is a clean no-op: the host
//! package's installation must never be blocked by this hook.

use crate::config::Config;
use crate::error::{InstallerError, Result};
use crate::output::write_line;
use camino::Utf8Path;
use log::debug;
use std::io::Write;

/// Platform identifier fragments that denote a Windows-family host.
const WINDOWS_MARKERS: [&str; 4] = ["mswin", "win32", "mingw", "windows"];

/// A build file whose targets do nothing, for package managers that insist
/// on running `make` after a native extension hook.
const PLACEHOLDER_MAKEFILE: &str = "all:\n\ttrue\ninstall:\n\ttrue\n";

/// Why a run was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Windows-family platforms are not supported.
    UnsupportedPlatform,
    /// The package was rebuilt or customized after release.
    CustomPackaged,
    /// The package was not installed from an official release artefact.
    NotOfficialRelease,
}

impl SkipReason {
    /// Return the explanation shown to the operator, if any.
    ///
    /// Unsupported platforms are skipped silently.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform => None,
            Self::CustomPackaged => Some(
                "Binary downloading is only available when originally packaged. Stopping.",
            ),
            Self::NotOfficialRelease => Some(
                "This package is not installed from an official release package. Stopping.",
            ),
        }
    }
}

/// Outcome of the precondition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preflight {
    /// Downloading should go ahead.
    Proceed,
    /// Nothing should be downloaded; the run still succeeds.
    Skip(SkipReason),
}

/// Return the identifier of the running host as `<arch>-<os>`.
#[must_use]
pub fn host_platform() -> String {
    format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
}

/// Return true for Windows-family platform identifiers.
///
/// # Examples
///
/// ```
/// use binaries_installer::bootstrap::is_windows_platform;
///
/// assert!(is_windows_platform("x64-mingw-ucrt"));
/// assert!(!is_windows_platform("x86_64-darwin"));
/// ```
#[must_use]
pub fn is_windows_platform(platform: &str) -> bool {
    let lowered = platform.to_ascii_lowercase();
    WINDOWS_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Decide whether the run should download anything.
///
/// Skip explanations are written to `out`.
pub fn check_preconditions(config: &Config, out: &mut dyn Write) -> Preflight {
    let preflight = evaluate(config);
    if let Preflight::Skip(reason) = preflight {
        debug!("skipping binary download: {reason:?}");
        if let Some(message) = reason.message() {
            write_line(out, message);
        }
    }
    preflight
}

fn evaluate(config: &Config) -> Preflight {
    // Checked in this order so the most fundamental reason is reported.
    if is_windows_platform(&config.platform) {
        return Preflight::Skip(SkipReason::UnsupportedPlatform);
    }
    if config.is_custom_packaged {
        return Preflight::Skip(SkipReason::CustomPackaged);
    }
    if !config.is_official_release {
        return Preflight::Skip(SkipReason::NotOfficialRelease);
    }
    Preflight::Proceed
}

/// Create the cache directory if needed and make it the working directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or entered.
pub fn prepare_cache_dir(dir: &Utf8Path) -> Result<()> {
    let cache_error = |source| InstallerError::CacheDir {
        path: dir.to_owned(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(cache_error)?;
    std::env::set_current_dir(dir).map_err(cache_error)?;
    debug!("working in download cache {dir}");
    Ok(())
}

/// Write a placeholder `Makefile` into `dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_placeholder_makefile(dir: &Utf8Path) -> Result<()> {
    let path = dir.join("Makefile");
    std::fs::write(&path, PLACEHOLDER_MAKEFILE)
        .map_err(|source| InstallerError::PlaceholderWrite { path, source })
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
