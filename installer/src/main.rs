//! Binary download hook entrypoint.
//!
//! The host package manager runs this binary from the extension build
//! directory after installing the package. It leaves a placeholder
//! `Makefile` behind, then downloads the prebuilt bundles for the
//! installed release into the download cache.

use binaries_installer::artefact::download::HttpFetcher;
use binaries_installer::bootstrap::{host_platform, is_windows_platform, write_placeholder_makefile};
use binaries_installer::cli::Cli;
use binaries_installer::config::{Config, config_path, process_env};
use binaries_installer::dirs::SystemBaseDirs;
use binaries_installer::error::Result;
use binaries_installer::install_flow::{InstallContext, run_install};
use binaries_installer::logging;
use binaries_installer::output::write_line;
use camino::Utf8Path;
use clap::Parser;
use log::debug;
use std::error::Error as _;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    logging::init_from_env();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    write_placeholder_makefile(Utf8Path::new("."))?;

    // Windows hosts stop before the metadata is even read.
    let platform = host_platform();
    if is_windows_platform(&platform) {
        debug!("binary download is not supported on {platform}");
        return Ok(());
    }

    let path = config_path(process_env);
    let config = Config::load(&path)?.with_env_overrides(process_env);
    debug!("loaded package metadata from {path}");

    let dirs = SystemBaseDirs;
    let fetcher = HttpFetcher;
    let context = InstallContext {
        config: &config,
        dirs: &dirs,
        fetcher: &fetcher,
        policy: cli.failure_policy(),
    };
    run_install(&context, out)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(stderr, &err);
            let mut source = err.source();
            while let Some(cause) = source {
                write_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binaries_installer::error::InstallerError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = InstallerError::ConfigParse {
            path: "pkg/binaries.toml".into(),
            reason: "missing field `version_string`".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("invalid configuration at pkg/binaries.toml"));
    }

    #[test]
    fn exit_code_for_run_result_prints_the_cause_chain() {
        let err = InstallerError::ConfigRead {
            path: "missing.toml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("failed to read configuration at missing.toml"));
        assert!(stderr_text.contains("caused by: no such file"));
    }
}
