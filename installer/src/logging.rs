//! Diagnostic output for the hook binary.
//!
//! The crate logs through the `log` facade. [`init`] installs a
//! `tracing-subscriber` formatter that also captures `log` records and
//! writes them to stderr, filtered by `BINARIES_LOG` (default `warn`).
//! Warnings and errors carry a `*** ` prefix so they stand out among the
//! package manager's own output.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "BINARIES_LOG";

/// Event format: the message alone, flagged with `*** ` at `warn` and above.
#[derive(Debug, Default, Clone, Copy)]
pub struct HookFormat;

impl<S, N> FormatEvent<S, N> for HookFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if *event.metadata().level() <= Level::WARN {
            write!(writer, "*** ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build the filter from raw directives, falling back to `warn`.
///
/// Invalid directives are dropped rather than rejected.
///
/// # Examples
///
/// ```
/// use binaries_installer::logging::env_filter;
///
/// assert_eq!(env_filter(None).to_string(), "warn");
/// assert_eq!(env_filter(Some("debug")).to_string(), "debug");
/// ```
#[must_use]
pub fn env_filter(raw: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(raw.unwrap_or_default())
}

/// Install the formatter writing to `writer`.
///
/// Later calls are ignored once a subscriber is installed.
pub fn init<W>(filter: EnvFilter, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .event_format(HookFormat)
        .try_init();
    if installed.is_err() {
        // A subscriber is already in place.
    }
}

/// Install the formatter on stderr at the level named by [`LOG_ENV`].
pub fn init_from_env() {
    let raw = std::env::var(LOG_ENV).ok();
    init(env_filter(raw.as_deref()), std::io::stderr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().expect("lock").clone()).expect("UTF-8 log output")
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(filter: &str, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter(Some(filter)))
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .event_format(HookFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        captured.text()
    }

    #[rstest]
    #[case::unset(None, "warn")]
    #[case::blank(Some(""), "warn")]
    #[case::info(Some("info"), "info")]
    #[case::off(Some("off"), "off")]
    #[case::garbage(Some("=[not a directive"), "warn")]
    fn filter_falls_back_to_warn(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(env_filter(raw).to_string(), expected);
    }

    #[test]
    fn warnings_and_errors_are_flagged() {
        let text = capture("trace", || {
            tracing::error!("boom");
            tracing::warn!("site down");
            tracing::info!("fetched");
        });
        assert_eq!(text, "*** boom\n*** site down\nfetched\n");
    }

    #[test]
    fn default_filter_hides_info() {
        let text = capture("warn", || {
            tracing::info!("fetched");
            tracing::warn!("site down");
        });
        assert_eq!(text, "*** site down\n");
    }
}
