//! Shared test utilities for the installer crate.

use crate::artefact::download::{ArtefactFetcher, FetchError};
use crate::config::Config;
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::RefCell;
use std::time::Duration;

/// How a scripted mirror answers every request.
#[derive(Debug, Clone)]
pub enum MirrorBehaviour {
    /// Serve these bytes for any artefact.
    Serve(Vec<u8>),
    /// Answer 404 for any artefact.
    NotFound,
    /// Write these bytes, then fail as if the budget ran out.
    StallAfter(Vec<u8>),
}

/// A stub implementation of `ArtefactFetcher` for testing.
///
/// Each mirror is matched by URL prefix. Every requested URL is recorded
/// so tests can assert which mirrors were contacted and in what order.
/// URLs with no matching mirror fail as transport errors.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    mirrors: Vec<(String, MirrorBehaviour)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedFetcher {
    /// Creates a fetcher that knows no mirrors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the behaviour of the mirror rooted at `base_url`.
    #[must_use]
    pub fn with_mirror(mut self, base_url: &str, behaviour: MirrorBehaviour) -> Self {
        self.mirrors.push((base_url.to_owned(), behaviour));
        self
    }

    /// Returns every URL requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn behaviour_for(&self, url: &str) -> Option<&MirrorBehaviour> {
        self.mirrors
            .iter()
            .find(|(base, _)| url.starts_with(base.as_str()))
            .map(|(_, behaviour)| behaviour)
    }
}

impl ArtefactFetcher for ScriptedFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Utf8Path,
        _ca_cert: Option<&Utf8Path>,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        self.calls.borrow_mut().push(url.to_owned());
        match self.behaviour_for(url) {
            Some(MirrorBehaviour::Serve(bytes)) => {
                std::fs::write(dest, bytes).map_err(FetchError::Io)
            }
            Some(MirrorBehaviour::NotFound) => Err(FetchError::NotFound {
                url: url.to_owned(),
            }),
            Some(MirrorBehaviour::StallAfter(bytes)) => {
                std::fs::write(dest, bytes).map_err(FetchError::Io)?;
                Err(FetchError::Timeout {
                    url: url.to_owned(),
                    timeout,
                })
            }
            None => Err(FetchError::Transport {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            }),
        }
    }
}

/// Builds an official-release configuration caching into `cache_dir`.
///
/// The site list is empty; tests add the mirrors they need.
pub fn sample_config(cache_dir: Utf8PathBuf) -> Config {
    Config {
        version_string: "6.0.0".to_owned(),
        nginx_version: "1.24.0".to_owned(),
        ruby_compat_id: "x86_64-linux-ruby3.2.0".to_owned(),
        cxx_compat_id: "x86_64-linux".to_owned(),
        is_custom_packaged: false,
        is_official_release: true,
        cache_dir: Some(cache_dir),
        platform: "x86_64-linux".to_owned(),
        sites: Vec::new(),
        override_url: None,
    }
}
