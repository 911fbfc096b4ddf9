//! Integration tests for the HTTP fetcher against a local mock server.

use binaries_installer::artefact::download::{ArtefactFetcher, FetchError, HttpFetcher};
use binaries_installer::artefact::naming::{
    ArtefactKind, ArtefactName, ArtefactRequest, BinaryCompat,
};
use binaries_installer::cache::CacheDir;
use binaries_installer::prebuilt::{DownloadResult, Orchestrator};
use binaries_installer::sites::{Site, SiteList};
use camino::Utf8PathBuf;
use httpmock::prelude::*;
use rstest::{fixture, rstest};
use std::net::TcpListener;
use std::time::{Duration, Instant};

const ARTEFACT_PATH: &str = "/6.0.0/agent-x86_64-linux.tar.gz";
const BUDGET: Duration = Duration::from_secs(10);

struct Scratch {
    _temp: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn dest(&self) -> Utf8PathBuf {
        self.root.join("agent-x86_64-linux.tar.gz.tmp")
    }
}

#[fixture]
fn scratch() -> Scratch {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    Scratch { _temp: temp, root }
}

fn ca_fixture() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ca.pem")
}

#[rstest]
fn successful_response_is_written_to_destination(scratch: Scratch) {
    let server = MockServer::start();
    let artefact = server.mock(|when, then| {
        when.method(GET).path(ARTEFACT_PATH);
        then.status(200).body("agent bundle");
    });

    HttpFetcher
        .fetch(&server.url(ARTEFACT_PATH), &scratch.dest(), None, BUDGET)
        .expect("fetch should succeed");

    artefact.assert_hits(1);
    let bytes = std::fs::read(scratch.dest()).expect("read destination");
    assert_eq!(bytes, b"agent bundle");
}

#[rstest]
fn missing_artefact_is_not_found(scratch: Scratch) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ARTEFACT_PATH);
        then.status(404);
    });
    let url = server.url(ARTEFACT_PATH);

    let err = HttpFetcher
        .fetch(&url, &scratch.dest(), None, BUDGET)
        .expect_err("404 should fail");

    assert!(
        matches!(&err, FetchError::NotFound { url: failed } if *failed == url),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn server_error_keeps_the_status(scratch: Scratch) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ARTEFACT_PATH);
        then.status(503);
    });

    let err = HttpFetcher
        .fetch(&server.url(ARTEFACT_PATH), &scratch.dest(), None, BUDGET)
        .expect_err("503 should fail");

    assert!(
        matches!(err, FetchError::Status { status: 503, .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn slow_server_times_out_within_budget(scratch: Scratch) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(ARTEFACT_PATH);
        then.status(200)
            .body("too late")
            .delay(Duration::from_secs(5));
    });
    let budget = Duration::from_millis(500);

    let started = Instant::now();
    let err = HttpFetcher
        .fetch(&server.url(ARTEFACT_PATH), &scratch.dest(), None, budget)
        .expect_err("slow server should fail");

    assert!(
        started.elapsed() < Duration::from_secs(4),
        "fetch outlived its budget: {:?}",
        started.elapsed()
    );
    assert!(
        matches!(err, FetchError::Timeout { timeout, .. } if timeout == budget),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn refused_connection_is_a_transport_error(scratch: Scratch) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let err = HttpFetcher
        .fetch(
            &format!("http://{addr}{ARTEFACT_PATH}"),
            &scratch.dest(),
            None,
            BUDGET,
        )
        .expect_err("refused connection should fail");

    assert!(
        matches!(err, FetchError::Transport { .. }),
        "unexpected error: {err:?}"
    );
    assert!(!scratch.dest().exists());
}

#[rstest]
fn pinned_site_failing_tls_falls_back_to_next_site(scratch: Scratch) {
    let server = MockServer::start();
    let artefact = server.mock(|when, then| {
        when.method(GET).path(ARTEFACT_PATH);
        then.status(200).body("agent bundle");
    });
    // The mock speaks plain HTTP, so a TLS handshake against it can never
    // verify, whatever CA is pinned.
    let pinned = Site::new(format!("https://{}", server.address()), Some(ca_fixture()));
    let plain = Site::new(server.base_url(), None);
    let sites = SiteList::resolve(&[pinned, plain.clone()], None);

    let compat = BinaryCompat {
        ruby_compat_id: "x86_64-linux-ruby3.2.0".to_owned(),
        cxx_compat_id: "x86_64-linux".to_owned(),
        nginx_version: "1.24.0".to_owned(),
    };
    let name = ArtefactName::new(ArtefactKind::Agent, &compat);
    let request = ArtefactRequest::new(name.clone(), BUDGET);
    let cache = CacheDir::new(scratch.root.clone());
    let orchestrator = Orchestrator::new(&cache, &sites, "6.0.0", &HttpFetcher);

    let mut out = Vec::new();
    let result = orchestrator.download(&request, &mut out);

    assert_eq!(result, DownloadResult::Downloaded { site: plain });
    artefact.assert_hits(1);
    let bytes = std::fs::read(cache.final_path(&name)).expect("read artefact");
    assert_eq!(bytes, b"agent bundle");
}
