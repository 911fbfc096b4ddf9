//! CLI argument definitions for the binary download hook.
//!
//! The hook is invoked by the host package manager with no arguments, or
//! with `--abort-on-error` from release tooling that wants a hard failure
//! when any bundle is missing.

use crate::prebuilt::FailurePolicy;
use clap::Parser;

/// Download prebuilt native binaries for an installed package.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "download-binaries")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download prebuilt native binaries for an installed package.\n\n",
    "Each bundle (runtime extension, web server, agent) is fetched from the ",
    "first mirror that serves it and stored in the download cache. Bundles ",
    "already in the cache are skipped, so rerunning is cheap and safe.\n\n",
    "Missing bundles are reported as warnings and do not fail the run unless ",
    "--abort-on-error is given.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  BINARIES_CONFIG     Package metadata file [default: binaries.toml]\n",
    "  BINARIES_URL_ROOT   Use this single mirror instead of the configured list\n",
    "  BINARIES_LOG        Log level: error, warn, info, debug, trace, off [default: warn]",
))]
pub struct Cli {
    /// Exit with a failure status when a bundle cannot be downloaded.
    #[arg(long)]
    pub abort_on_error: bool,
}

impl Cli {
    /// Return how the run treats a bundle no mirror could provide.
    ///
    /// # Examples
    ///
    /// ```
    /// use binaries_installer::cli::Cli;
    /// use binaries_installer::prebuilt::FailurePolicy;
    ///
    /// let cli = Cli { abort_on_error: true };
    /// assert_eq!(cli.failure_policy(), FailurePolicy::Abort);
    /// ```
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.abort_on_error {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
