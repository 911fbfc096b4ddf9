//! Operator-facing output for the download hook.
//!
//! Progress lines are written to an injected writer (stdout in the binary)
//! so tests can capture them; diagnostics go through the `log` facade
//! instead.

use crate::prebuilt::RunSummary;
use std::io::Write;

/// Write one line, ignoring failures.
///
/// Output is best-effort: a closed stream must not fail the hook.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the closing summary for a run.
///
/// # Examples
///
/// ```
/// use binaries_installer::output::summary_message;
/// use binaries_installer::prebuilt::RunSummary;
///
/// let summary = RunSummary {
///     already_present: 1,
///     downloaded: 2,
///     failed: 0,
/// };
/// assert_eq!(
///     summary_message(&summary),
///     "Binaries: 2 downloaded, 1 already present, 0 unavailable"
/// );
/// ```
#[must_use]
pub fn summary_message(summary: &RunSummary) -> String {
    format!(
        "Binaries: {} downloaded, {} already present, {} unavailable",
        summary.downloaded, summary.already_present, summary.failed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_line_appends_newline() {
        let mut buffer = Vec::new();
        write_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }

    #[test]
    fn write_line_ignores_write_failures() {
        write_line(&mut BrokenPipe, "dropped");
    }

    #[test]
    fn summary_message_reports_failures() {
        let summary = RunSummary {
            already_present: 0,
            downloaded: 1,
            failed: 2,
        };
        assert!(summary_message(&summary).contains("2 unavailable"));
    }
}
