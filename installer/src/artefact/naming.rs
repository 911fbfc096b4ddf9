//! Compatibility-qualified naming for prebuilt binary bundles.
//!
//! Each bundle is published under a filename that encodes the binary
//! compatibility of the machine it was built for:
//!
//! - `rubyext-<ruby_compat_id>.tar.gz`
//! - `nginx-<nginx_version>-<cxx_compat_id>.tar.gz`
//! - `agent-<cxx_compat_id>.tar.gz`
//!
//! Identifiers are treated as opaque strings. A malformed identifier simply
//! yields a name that no mirror serves, which surfaces later as an ordinary
//! download failure.

use std::fmt;
use std::time::Duration;

/// The fixed file extension for every bundle.
const ARTEFACT_EXTENSION: &str = ".tar.gz";

/// Suffix appended to a bundle name while its download is in flight.
const TEMP_SUFFIX: &str = ".tmp";

/// Binary compatibility identifiers reported by the host package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryCompat {
    /// Identifies the Ruby ABI the native extension was built against.
    pub ruby_compat_id: String,
    /// Identifies the C++ ABI shared by the web server and the agent.
    pub cxx_compat_id: String,
    /// The web server version the package prefers.
    pub nginx_version: String,
}

/// The three subsystems shipped as prebuilt bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtefactKind {
    /// The runtime's native extension.
    RubyExtension,
    /// The embedded web server.
    Nginx,
    /// The agent executable.
    Agent,
}

impl ArtefactKind {
    /// Every kind, in the order a run downloads them.
    pub const ALL: [Self; 3] = [Self::RubyExtension, Self::Nginx, Self::Agent];

    /// Total time budget for one download attempt of this kind.
    ///
    /// Budgets grow with the typical bundle size: the extension is small,
    /// the agent is by far the largest.
    #[must_use]
    pub const fn default_timeout(self) -> Duration {
        match self {
            Self::RubyExtension => Duration::from_secs(10),
            Self::Nginx => Duration::from_secs(120),
            Self::Agent => Duration::from_secs(900),
        }
    }
}

/// A fully-qualified bundle filename.
///
/// # Examples
///
/// ```
/// use binaries_installer::artefact::naming::{ArtefactKind, ArtefactName, BinaryCompat};
///
/// let compat = BinaryCompat {
///     ruby_compat_id: "x86_64-linux-ruby3.2.0".to_owned(),
///     cxx_compat_id: "x86_64-linux".to_owned(),
///     nginx_version: "1.24.0".to_owned(),
/// };
///
/// let name = ArtefactName::new(ArtefactKind::Nginx, &compat);
/// assert_eq!(name.as_str(), "nginx-1.24.0-x86_64-linux.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtefactName(String);

impl ArtefactName {
    /// Build the filename for `kind` from the host's compatibility ids.
    #[must_use]
    pub fn new(kind: ArtefactKind, compat: &BinaryCompat) -> Self {
        let name = match kind {
            ArtefactKind::RubyExtension => {
                format!("rubyext-{}{ARTEFACT_EXTENSION}", compat.ruby_compat_id)
            }
            ArtefactKind::Nginx => format!(
                "nginx-{}-{}{ARTEFACT_EXTENSION}",
                compat.nginx_version, compat.cxx_compat_id
            ),
            ArtefactKind::Agent => format!("agent-{}{ARTEFACT_EXTENSION}", compat.cxx_compat_id),
        };
        Self(name)
    }

    /// Return the filename.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the name used while the bundle is still being written.
    #[must_use]
    pub fn temp_filename(&self) -> String {
        format!("{}{TEMP_SUFFIX}", self.0)
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One bundle a run must obtain, with its total time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactRequest {
    name: ArtefactName,
    timeout: Duration,
}

impl ArtefactRequest {
    /// Create a request for an already-qualified name.
    #[must_use]
    pub const fn new(name: ArtefactName, timeout: Duration) -> Self {
        Self { name, timeout }
    }

    /// Create a request for `kind` using its default time budget.
    #[must_use]
    pub fn for_kind(kind: ArtefactKind, compat: &BinaryCompat) -> Self {
        Self::new(ArtefactName::new(kind, compat), kind.default_timeout())
    }

    /// Return the bundle filename.
    #[must_use]
    pub const fn name(&self) -> &ArtefactName {
        &self.name
    }

    /// Return the total time budget for a single attempt.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Build the requests for every bundle a run needs, in download order.
#[must_use]
pub fn required_artefacts(compat: &BinaryCompat) -> Vec<ArtefactRequest> {
    ArtefactKind::ALL
        .iter()
        .map(|kind| ArtefactRequest::for_kind(*kind, compat))
        .collect()
}
