//! Single-site artefact retrieval.
//!
//! Provides a trait-based abstraction for fetching one bundle from one
//! mirror into a temporary path, enabling dependency injection for testing.
//! Every failure mode is reported as a [`FetchError`] value; the caller
//! treats any error as "this site failed for this artefact" and moves on to
//! the next mirror.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use ureq::tls::{PemItem, RootCerts, TlsConfig};

/// Trait for fetching a single artefact from a single URL.
///
/// Abstractions allow tests to script mirror behaviour without network
/// access.
///
/// # Examples
///
/// ```
/// use binaries_installer::artefact::download::HttpFetcher;
///
/// let fetcher = HttpFetcher;
/// // Use fetcher.fetch(url, dest, None, timeout) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher {
    /// Download `url` into `dest`, verifying TLS against `ca_cert` when
    /// given, and giving up once `timeout` has elapsed in total.
    ///
    /// # Errors
    ///
    /// Returns an error for any network, HTTP status, TLS, timeout, or
    /// write failure. `dest` may hold partial content afterwards.
    fn fetch<'a>(
        &self,
        url: &str,
        dest: &Utf8Path,
        ca_cert: Option<&'a Utf8Path>,
        timeout: Duration,
    ) -> Result<(), FetchError>;
}

/// Reasons a single fetch attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The site does not carry the artefact (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The site answered with another non-success status.
    #[error("{url} responded with HTTP status {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The transfer exceeded its total time budget.
    #[error("timed out after {timeout:?} downloading {url}")]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// The budget that was exceeded.
        timeout: Duration,
    },

    /// DNS, connection, TLS, or protocol failure.
    #[error("download failed for {url}: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The site's CA certificate bundle could not be used.
    #[error("cannot use CA certificate {path}: {reason}")]
    Certificate {
        /// Path to the certificate bundle.
        path: Utf8PathBuf,
        /// Why the bundle was rejected.
        reason: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] io::Error),
}

/// HTTP(S) fetcher using `ureq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl ArtefactFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Utf8Path,
        ca_cert: Option<&Utf8Path>,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        let agent = http_agent(ca_cert, timeout)?;
        let response = agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, timeout, &e))?;
        let mut file = File::create(dest)?;
        io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(|e| map_body_error(url, timeout, e))?;
        Ok(())
    }
}

/// Build a `ureq` agent whose global timeout covers the whole transfer.
///
/// Agents are built per attempt because both the budget and the trusted
/// roots vary by artefact and by site.
fn http_agent(ca_cert: Option<&Utf8Path>, timeout: Duration) -> Result<ureq::Agent, FetchError> {
    let mut builder = ureq::Agent::config_builder().timeout_global(Some(timeout));
    if let Some(path) = ca_cert {
        let tls = TlsConfig::builder()
            .root_certs(load_root_certs(path)?)
            .build();
        builder = builder.tls_config(tls);
    }
    Ok(ureq::Agent::new_with_config(builder.build()))
}

/// Read every certificate from a PEM bundle.
fn load_root_certs(path: &Utf8Path) -> Result<RootCerts, FetchError> {
    let certificate_error = |reason: String| FetchError::Certificate {
        path: path.to_owned(),
        reason,
    };

    let pem = std::fs::read(path).map_err(|e| certificate_error(e.to_string()))?;
    let mut certs = Vec::new();
    for item in ureq::tls::parse_pem(&pem) {
        match item {
            Ok(PemItem::Certificate(cert)) => certs.push(cert.to_owned()),
            Ok(_) => {}
            Err(e) => return Err(certificate_error(e.to_string())),
        }
    }

    if certs.is_empty() {
        return Err(certificate_error("no certificates found".to_owned()));
    }
    Ok(RootCerts::Specific(Arc::new(certs)))
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, timeout: Duration, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_owned(),
            status: *status,
        },
        ureq::Error::Timeout(_) => FetchError::Timeout {
            url: url.to_owned(),
            timeout,
        },
        ureq::Error::Io(io_err) if io_err.kind() == io::ErrorKind::TimedOut => {
            FetchError::Timeout {
                url: url.to_owned(),
                timeout,
            }
        }
        other => FetchError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Map an error raised while streaming the body to a [`FetchError`].
///
/// `ureq` surfaces body-phase failures through `std::io::Error`, wrapping
/// its own error type when the cause was the transport rather than the
/// local file.
fn map_body_error(url: &str, timeout: Duration, err: io::Error) -> FetchError {
    if err.kind() == io::ErrorKind::TimedOut {
        return FetchError::Timeout {
            url: url.to_owned(),
            timeout,
        };
    }
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<ureq::Error>())
    {
        Some(inner) => map_ureq_error(url, timeout, inner),
        None => FetchError::Io(err),
    }
}
