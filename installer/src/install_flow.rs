//! End-to-end hook run, separated from the binary so it can be driven with
//! injected collaborators.

use camino::Utf8Path;
use log::info;
use std::io::Write;

use crate::artefact::download::ArtefactFetcher;
use crate::artefact::naming::required_artefacts;
use crate::bootstrap::{Preflight, SkipReason, check_preconditions, prepare_cache_dir};
use crate::cache::CacheDir;
use crate::config::Config;
use crate::dirs::BaseDirs;
use crate::error::Result;
use crate::output::{summary_message, write_line};
use crate::prebuilt::{FailurePolicy, Orchestrator, RunSummary};

/// Collaborators and settings for one hook run.
pub struct InstallContext<'a> {
    /// Package metadata, with environment overrides applied.
    pub config: &'a Config,
    /// Platform directory provider for the default cache location.
    pub dirs: &'a dyn BaseDirs,
    /// Transport used for every download attempt.
    pub fetcher: &'a dyn ArtefactFetcher,
    /// How to treat a bundle no mirror could provide.
    pub policy: FailurePolicy,
}

/// How a hook run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Preconditions were not met; nothing was downloaded.
    Skipped(SkipReason),
    /// Every bundle was processed.
    Completed(RunSummary),
}

/// Run the hook: gate, prepare the cache directory, download every bundle.
///
/// # Errors
///
/// Returns an error when the cache directory cannot be resolved or
/// prepared, or when a bundle is unavailable under
/// [`FailurePolicy::Abort`].
pub fn run_install(context: &InstallContext<'_>, out: &mut dyn Write) -> Result<InstallOutcome> {
    if let Preflight::Skip(reason) = check_preconditions(context.config, out) {
        return Ok(InstallOutcome::Skipped(reason));
    }

    let cache_root = context.config.resolve_cache_dir(context.dirs)?;
    prepare_cache_dir(&cache_root)?;

    let summary = download_required(context, &cache_root, out)?;
    write_line(out, summary_message(&summary));
    Ok(InstallOutcome::Completed(summary))
}

/// Download every required bundle into `cache_root`.
///
/// The directory must already exist.
///
/// # Errors
///
/// Returns an error when a bundle is unavailable under
/// [`FailurePolicy::Abort`].
pub fn download_required(
    context: &InstallContext<'_>,
    cache_root: &Utf8Path,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let config = context.config;
    let cache = CacheDir::new(cache_root.to_owned());
    let sites = config.site_list();
    if let Some(url) = &config.override_url {
        info!("using mirror override {url}");
    }

    let requests = required_artefacts(&config.binary_compat());
    let orchestrator = Orchestrator::new(&cache, &sites, &config.version_string, context.fetcher);
    orchestrator.download_all(&requests, context.policy, out)
}
