//! Prebuilt bundle naming and single-site retrieval.
//!
//! # Sub-modules
//!
//! - [`naming`] - Compatibility-qualified bundle names and per-kind time
//!   budgets (`ArtefactName`, `ArtefactRequest`).
//! - [`download`] - The `ArtefactFetcher` trait and its `ureq` implementation.

pub mod download;
pub mod naming;
