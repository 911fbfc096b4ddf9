//! Download cache directory layout and the temp-then-rename protocol.
//!
//! A cached artefact is a file named exactly as the artefact inside the
//! cache directory. Its presence is the only idempotence marker. Downloads
//! land in `<name>.tmp` beside it and are renamed into place only once
//! complete, so the final name never holds a partial file.

use crate::artefact::naming::ArtefactName;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// The directory holding downloaded artefacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: Utf8PathBuf,
}

impl CacheDir {
    /// Wrap an existing cache directory.
    #[must_use]
    pub const fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// Return the cache directory path.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Return where a completed artefact lives.
    #[must_use]
    pub fn final_path(&self, name: &ArtefactName) -> Utf8PathBuf {
        self.root.join(name.as_str())
    }

    /// Return where an in-flight download is written.
    #[must_use]
    pub fn temp_path(&self, name: &ArtefactName) -> Utf8PathBuf {
        self.root.join(name.temp_filename())
    }

    /// Return true when the artefact has already been downloaded.
    #[must_use]
    pub fn contains(&self, name: &ArtefactName) -> bool {
        self.final_path(name).exists()
    }

    /// Move a completed temp file to its final name.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    pub fn promote(&self, name: &ArtefactName) -> io::Result<()> {
        std::fs::rename(self.temp_path(name), self.final_path(name))
    }

    /// Delete the artefact's temp file if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the file being absent.
    pub fn discard_temp(&self, name: &ArtefactName) -> io::Result<()> {
        remove_if_exists(&self.temp_path(name))
    }
}

/// Remove a file, treating "does not exist" as success.
///
/// # Errors
///
/// Returns any other I/O error from the removal.
pub fn remove_if_exists(path: &Utf8Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
