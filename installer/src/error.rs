//! Error types for the binary download hook.
//!
//! Only conditions that must stop the hook live here. Per-site download
//! failures are absorbed by the orchestrator and never reach this type; an
//! artefact that no site could provide only becomes an error under
//! abort-on-error mode.

use crate::artefact::naming::ArtefactName;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that terminate a hook run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The package metadata file could not be read.
    #[error("failed to read configuration at {path}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The package metadata file is not valid.
    #[error("invalid configuration at {path}: {reason}")]
    ConfigParse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// No cache directory was configured and none could be derived.
    #[error("could not determine download cache directory: {reason}")]
    CacheDirUnresolved {
        /// Why resolution failed.
        reason: String,
    },

    /// The cache directory could not be created or entered.
    #[error("failed to prepare download cache directory {path}")]
    CacheDir {
        /// Path of the cache directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The placeholder build file could not be written.
    #[error("failed to write placeholder build file {path}")]
    PlaceholderWrite {
        /// Path of the placeholder file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Every site failed for an artefact while running in abort-on-error mode.
    #[error("Cannot download {name}, aborting")]
    ArtefactUnavailable {
        /// The artefact that could not be obtained.
        name: ArtefactName,
        /// How many sites were tried.
        sites_tried: usize,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
