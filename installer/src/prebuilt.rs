//! Prebuilt bundle download orchestrator.
//!
//! For each required artefact the orchestrator:
//!
//! 1. returns early when the artefact is already in the cache directory,
//!    without touching the network;
//! 2. otherwise tries each mirror in priority order, streaming into
//!    `<name>.tmp` and renaming it into place on the first success;
//! 3. reports [`DownloadResult::Failed`] once every mirror has been tried.
//!
//! One transfer is in flight at a time, so the worst-case wall-clock cost
//! of a run is the sum of the per-artefact budgets times the mirror count.

use log::{error, warn};
use std::io::Write;

use crate::artefact::download::{ArtefactFetcher, FetchError};
use crate::artefact::naming::ArtefactRequest;
use crate::cache::CacheDir;
use crate::error::{InstallerError, Result};
use crate::output::write_line;
use crate::sites::{Site, SiteList};

/// The outcome of obtaining one artefact.
///
/// This is deliberately not a `Result`: an artefact no mirror could serve
/// is only fatal under [`FailurePolicy::Abort`], which [`Orchestrator::download_all`]
/// decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// The artefact was already cached; nothing was fetched.
    AlreadyPresent,
    /// The artefact was downloaded and moved into place.
    Downloaded {
        /// The mirror that served it.
        site: Site,
    },
    /// Every mirror failed.
    Failed {
        /// How many mirrors were tried.
        sites_tried: usize,
    },
}

/// What to do when an artefact cannot be obtained from any mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Warn and carry on with the next artefact.
    #[default]
    Continue,
    /// Stop the run with an error.
    Abort,
}

/// Per-run tally of download outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Artefacts found in the cache.
    pub already_present: usize,
    /// Artefacts fetched during this run.
    pub downloaded: usize,
    /// Artefacts no mirror could provide.
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, result: &DownloadResult) {
        match result {
            DownloadResult::AlreadyPresent => self.already_present += 1,
            DownloadResult::Downloaded { .. } => self.downloaded += 1,
            DownloadResult::Failed { .. } => self.failed += 1,
        }
    }
}

/// Drives a fetcher across the mirror list for each artefact.
pub struct Orchestrator<'a> {
    cache: &'a CacheDir,
    sites: &'a SiteList,
    version: &'a str,
    fetcher: &'a dyn ArtefactFetcher,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator for release `version`.
    #[must_use]
    pub const fn new(
        cache: &'a CacheDir,
        sites: &'a SiteList,
        version: &'a str,
        fetcher: &'a dyn ArtefactFetcher,
    ) -> Self {
        Self {
            cache,
            sites,
            version,
            fetcher,
        }
    }

    /// Obtain one artefact, trying each mirror in order.
    ///
    /// Progress lines are written to `out`; per-mirror failures are
    /// logged as warnings and never propagate.
    pub fn download(&self, request: &ArtefactRequest, out: &mut dyn Write) -> DownloadResult {
        let name = request.name();
        if self.cache.contains(name) {
            write_line(
                out,
                format!("{} already exists", self.cache.final_path(name)),
            );
            return DownloadResult::AlreadyPresent;
        }

        for site in self.sites {
            if self.try_site(site, request, out) {
                return DownloadResult::Downloaded { site: site.clone() };
            }
        }

        DownloadResult::Failed {
            sites_tried: self.sites.len(),
        }
    }

    /// Obtain every artefact in order, applying `policy` to failures.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ArtefactUnavailable`] for the first
    /// artefact no mirror could serve when `policy` is
    /// [`FailurePolicy::Abort`]. Later artefacts are not attempted.
    pub fn download_all(
        &self,
        requests: &[ArtefactRequest],
        policy: FailurePolicy,
        out: &mut dyn Write,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for request in requests {
            let result = self.download(request, out);
            summary.record(&result);

            let DownloadResult::Failed { sites_tried } = result else {
                continue;
            };
            let name = request.name();
            match policy {
                FailurePolicy::Abort => {
                    error!("Cannot download {name} from any of {sites_tried} site(s)");
                    return Err(InstallerError::ArtefactUnavailable {
                        name: name.clone(),
                        sites_tried,
                    });
                }
                FailurePolicy::Continue => {
                    warn!("Cannot download {name} from any of {sites_tried} site(s); continuing");
                }
            }
        }
        Ok(summary)
    }

    /// Attempt one mirror, cleaning up after any failure.
    fn try_site(&self, site: &Site, request: &ArtefactRequest, out: &mut dyn Write) -> bool {
        let name = request.name();
        let url = site.artefact_url(self.version, name);
        write_line(
            out,
            format!("Attempting to download {url} into {}", self.cache.root()),
        );

        match self.fetch_into_place(site, &url, request) {
            Ok(()) => true,
            Err(e) => {
                warn!("{e}");
                if let Err(cleanup) = self.cache.discard_temp(name) {
                    warn!(
                        "could not remove {}: {cleanup}",
                        self.cache.temp_path(name)
                    );
                }
                false
            }
        }
    }

    /// Stream into the temp path and rename into place.
    fn fetch_into_place(
        &self,
        site: &Site,
        url: &str,
        request: &ArtefactRequest,
    ) -> std::result::Result<(), FetchError> {
        let name = request.name();
        self.cache.discard_temp(name)?;
        let temp_path = self.cache.temp_path(name);
        self.fetcher
            .fetch(url, &temp_path, site.ca_cert(), request.timeout())?;
        self.cache.promote(name)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "prebuilt_tests.rs"]
mod tests;
