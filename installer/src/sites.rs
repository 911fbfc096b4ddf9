//! Mirror site list resolution.
//!
//! Sites are tried in list order: earlier entries are the preferred, faster
//! hosts and later entries are fallback mirrors. A single custom mirror can
//! replace the whole list via `BINARIES_URL_ROOT`; such an override is
//! trusted as-is and carries no certificate pinning.

use crate::artefact::naming::ArtefactName;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fmt;

/// One mirror serving the full artefact set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Site {
    #[serde(rename = "url")]
    base_url: String,
    #[serde(default, rename = "cert")]
    ca_cert: Option<Utf8PathBuf>,
}

impl Site {
    /// Create a site from its base URL and optional CA bundle.
    #[must_use]
    pub fn new(base_url: impl Into<String>, ca_cert: Option<Utf8PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            ca_cert,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Return the CA bundle used to verify this site, if pinned.
    #[must_use]
    pub fn ca_cert(&self) -> Option<&Utf8Path> {
        self.ca_cert.as_deref()
    }

    /// Build the download URL for `name` at release `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use binaries_installer::artefact::naming::{ArtefactKind, ArtefactName, BinaryCompat};
    /// use binaries_installer::sites::Site;
    ///
    /// let compat = BinaryCompat {
    ///     ruby_compat_id: "ruby".to_owned(),
    ///     cxx_compat_id: "x86_64-linux".to_owned(),
    ///     nginx_version: "1.24.0".to_owned(),
    /// };
    /// let site = Site::new("https://mirror.example.org/releases/", None);
    /// let name = ArtefactName::new(ArtefactKind::Agent, &compat);
    ///
    /// assert_eq!(
    ///     site.artefact_url("6.0.0", &name),
    ///     "https://mirror.example.org/releases/6.0.0/agent-x86_64-linux.tar.gz"
    /// );
    /// ```
    #[must_use]
    pub fn artefact_url(&self, version: &str, name: &ArtefactName) -> String {
        format!("{}/{version}/{name}", self.base_url.trim_end_matches('/'))
    }

    /// Resolve a relative certificate path against `base`.
    #[must_use]
    pub fn with_cert_relative_to(self, base: &Utf8Path) -> Self {
        let ca_cert = self.ca_cert.map(|cert| {
            if cert.is_relative() {
                base.join(cert)
            } else {
                cert
            }
        });
        Self { ca_cert, ..self }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

/// The ordered mirrors a run will try.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteList(Vec<Site>);

impl SiteList {
    /// Resolve the effective list from the configured defaults and an
    /// optional override URL.
    ///
    /// A blank override is ignored.
    #[must_use]
    pub fn resolve(defaults: &[Site], override_url: Option<&str>) -> Self {
        match override_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self(vec![Site::new(url, None)]),
            None => Self(defaults.to_vec()),
        }
    }

    /// Return the number of sites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true when there is no site to try.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the sites in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a SiteList {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn defaults() -> Vec<Site> {
        vec![
            Site::new(
                "https://primary.example.org/releases",
                Some(Utf8PathBuf::from("/etc/ext/primary.crt")),
            ),
            Site::new("https://mirror.example.net/releases", None),
        ]
    }

    #[rstest]
    fn defaults_are_kept_in_priority_order(defaults: Vec<Site>) {
        let sites = SiteList::resolve(&defaults, None);
        let urls: Vec<&str> = sites.iter().map(Site::base_url).collect();
        assert_eq!(
            urls,
            vec![
                "https://primary.example.org/releases",
                "https://mirror.example.net/releases",
            ]
        );
    }

    #[rstest]
    fn override_replaces_defaults_without_pinning(defaults: Vec<Site>) {
        let sites = SiteList::resolve(&defaults, Some("http://localhost:8080/bin"));
        assert_eq!(sites.len(), 1);
        let site = sites.iter().next().expect("one site");
        assert_eq!(site.base_url(), "http://localhost:8080/bin");
        assert!(site.ca_cert().is_none());
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   ")]
    fn blank_override_is_ignored(defaults: Vec<Site>, #[case] raw: &str) {
        let sites = SiteList::resolve(&defaults, Some(raw));
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn empty_defaults_resolve_to_empty_list() {
        assert!(SiteList::resolve(&[], None).is_empty());
    }

    #[rstest]
    #[case::relative("certs/ca.crt", "/opt/ext/certs/ca.crt")]
    #[case::absolute("/etc/ssl/ca.crt", "/etc/ssl/ca.crt")]
    fn certificate_paths_resolve_against_config_dir(#[case] raw: &str, #[case] expected: &str) {
        let site = Site::new("https://example.org", Some(Utf8PathBuf::from(raw)))
            .with_cert_relative_to(Utf8Path::new("/opt/ext"));
        assert_eq!(site.ca_cert(), Some(Utf8Path::new(expected)));
    }
}
