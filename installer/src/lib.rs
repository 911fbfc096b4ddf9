//! Prebuilt binary download hook library.
//!
//! This crate runs after a packaged native extension is installed and
//! downloads its prebuilt platform-specific bundles from a prioritized list
//! of mirrors, so end users need no native toolchain. It is used by the
//! `download-binaries` CLI binary and can be driven programmatically with
//! injected collaborators for testing.
//!
//! # Modules
//!
//! - [`artefact`] - Bundle naming and single-site retrieval
//! - [`bootstrap`] - Platform and release gating, cache directory setup
//! - [`cache`] - Cache layout and the temp-then-rename protocol
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Package metadata loading
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Error types for fatal conditions
//! - [`install_flow`] - End-to-end hook run
//! - [`logging`] - `log` backend for the binary
//! - [`output`] - Operator-facing progress output
//! - [`prebuilt`] - Mirror fallback orchestration
//! - [`sites`] - Mirror list resolution

pub mod artefact;
pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod install_flow;
pub mod logging;
pub mod output;
pub mod prebuilt;
pub mod sites;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
