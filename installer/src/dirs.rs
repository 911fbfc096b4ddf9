//! Directory resolution abstraction for platform-specific paths.

use directories_next::ProjectDirs;
use std::path::PathBuf;

/// Application name used for platform directories.
const APP_NAME: &str = "binaries-installer";

/// Provides base directories that vary by platform and user.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Return the per-user cache directory for this application.
    fn cache_dir(&self) -> Option<PathBuf>;
}

/// Resolves directories from the running system via `directories-next`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn cache_dir(&self) -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.cache_dir().to_path_buf())
    }
}
