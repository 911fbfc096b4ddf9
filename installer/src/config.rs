//! Package metadata consumed by the download hook.
//!
//! The host package ships a `binaries.toml` describing the release it came
//! from: its version, the compatibility identifiers of the machine it was
//! installed on, whether it is an official distributable, and the mirrors
//! that serve its prebuilt bundles. The hook treats these values as given;
//! it does not detect or validate them.
//!
//! ```toml
//! version_string = "6.0.0"
//! nginx_version = "1.24.0"
//! ruby_compat_id = "x86_64-linux-ruby3.2.0"
//! cxx_compat_id = "x86_64-linux"
//! is_official_release = true
//!
//! [[sites]]
//! url = "https://downloads.example.org/binaries/releases"
//! cert = "resources/downloads_ca.crt"
//! ```

use crate::artefact::naming::BinaryCompat;
use crate::bootstrap::host_platform;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::sites::{Site, SiteList};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Environment variable naming the metadata file.
pub const CONFIG_ENV: &str = "BINARIES_CONFIG";

/// Environment variable supplying a single custom mirror base URL.
pub const URL_OVERRIDE_ENV: &str = "BINARIES_URL_ROOT";

/// Metadata file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "binaries.toml";

/// Subdirectory of the platform cache directory holding downloads.
const DOWNLOAD_CACHE_SUBDIR: &str = "download_cache";

/// Everything the hook needs to know about the installed package.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Release version, used as the directory component of download URLs.
    pub version_string: String,
    /// Preferred web server version.
    pub nginx_version: String,
    /// Ruby extension compatibility identifier.
    pub ruby_compat_id: String,
    /// C++ binary compatibility identifier.
    pub cxx_compat_id: String,
    /// True when the package was rebuilt or customized by a distributor.
    #[serde(default)]
    pub is_custom_packaged: bool,
    /// True when the package was installed from an official release.
    #[serde(default)]
    pub is_official_release: bool,
    /// Where downloaded bundles are cached [default: platform cache dir].
    #[serde(default)]
    pub cache_dir: Option<Utf8PathBuf>,
    /// Host platform identifier [default: `<arch>-<os>`].
    #[serde(default = "host_platform")]
    pub platform: String,
    /// Default mirrors in priority order.
    #[serde(default)]
    pub sites: Vec<Site>,
    /// Single custom mirror taken from [`URL_OVERRIDE_ENV`].
    #[serde(skip)]
    pub override_url: Option<String>,
}

impl Config {
    /// Parse metadata from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text is malformed, misses a required
    /// field, or carries an unknown one.
    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load metadata from `path`.
    ///
    /// Relative `cache_dir` and certificate paths are resolved against the
    /// file's directory, so the result holds only absolute paths and stays
    /// valid after the working directory changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let read_error = |source| InstallerError::ConfigRead {
            path: path.to_owned(),
            source,
        };
        let contents = std::fs::read_to_string(path).map_err(read_error)?;
        let parsed = Self::from_toml(&contents).map_err(|e| InstallerError::ConfigParse {
            path: path.to_owned(),
            reason: e.message().to_owned(),
        })?;

        let absolute = camino::absolute_utf8(path).map_err(read_error)?;
        let base = absolute.parent().unwrap_or_else(|| Utf8Path::new("/"));
        let cache_dir = parsed.cache_dir.map(|dir| base.join(dir));
        let sites = parsed
            .sites
            .into_iter()
            .map(|site| site.with_cert_relative_to(base))
            .collect();
        Ok(Self {
            cache_dir,
            sites,
            ..parsed
        })
    }

    /// Overlay settings taken from the environment.
    ///
    /// The lookup is injected so callers and tests decide where values come
    /// from. Blank values are ignored.
    #[must_use]
    pub fn with_env_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let override_url = lookup(URL_OVERRIDE_ENV)
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .or(self.override_url);
        Self {
            override_url,
            ..self
        }
    }

    /// Return the compatibility identifiers used for naming artefacts.
    #[must_use]
    pub fn binary_compat(&self) -> BinaryCompat {
        BinaryCompat {
            ruby_compat_id: self.ruby_compat_id.clone(),
            cxx_compat_id: self.cxx_compat_id.clone(),
            nginx_version: self.nginx_version.clone(),
        }
    }

    /// Return the mirrors to try, honouring the override.
    #[must_use]
    pub fn site_list(&self) -> SiteList {
        SiteList::resolve(&self.sites, self.override_url.as_deref())
    }

    /// Return the configured cache directory, or the platform default.
    ///
    /// A relative configured directory is taken relative to the current
    /// working directory and returned in absolute form.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured directory cannot be made
    /// absolute, or when no directory is configured and the platform cache
    /// directory is unknown or not valid UTF-8.
    pub fn resolve_cache_dir(&self, dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return camino::absolute_utf8(dir).map_err(|e| InstallerError::CacheDirUnresolved {
                reason: format!("cannot make {dir} absolute: {e}"),
            });
        }

        let base = dirs
            .cache_dir()
            .ok_or_else(|| InstallerError::CacheDirUnresolved {
                reason: "platform cache directory is unknown".to_owned(),
            })?;
        let base_utf8 =
            Utf8PathBuf::from_path_buf(base).map_err(|path| InstallerError::CacheDirUnresolved {
                reason: format!("cache directory is not valid UTF-8: {}", path.display()),
            })?;
        Ok(base_utf8.join(DOWNLOAD_CACHE_SUBDIR))
    }
}

/// Return the metadata file path named by the environment, falling back to
/// [`DEFAULT_CONFIG_FILE`] in the working directory.
#[must_use]
pub fn config_path<F>(lookup: F) -> Utf8PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(CONFIG_ENV)
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| Utf8PathBuf::from(DEFAULT_CONFIG_FILE), Utf8PathBuf::from)
}

/// Look up a variable in the process environment.
#[must_use]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
