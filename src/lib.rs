//! flatpak-maven-deps - Maven dependency sources for Flatpak manifests
//!
//! Flatpak builds run offline, so every Maven artifact an application needs
//! must be listed in the manifest as a checksummed `file` source. This crate
//! regenerates that list by observation: it builds the upstream commit with an
//! empty local repository, reads every `Downloaded from` line in the build log
//! and records each artifact's URL, location and SHA-512.
//!
//! # Architecture Overview
//!
//! ```text
//! manifest ──► build ──► maven::log_scan ──► maven::source ──► update
//!  (commit)   (log+repo)  (classified URLs)   (file sources)   (sorted JSON)
//! ```
//!
//! - [`manifest`] - finds the upstream git source and the SDK in the manifest
//! - [`build`] - clones and builds the source in a temporary workspace
//! - [`maven`] - classifies downloaded URLs and turns them into Flatpak sources
//! - [`update`] - runs the pipeline and writes `maven-dependencies.json`
//! - [`sandbox`] - runs the pipeline again inside the Flatpak SDK
//!
//! ## Supporting Modules
//!
//! - [`process`] - external commands behind the [`process::CommandRunner`] seam
//! - [`cli`] - argument parsing, root guard and Ctrl-C handling
//! - [`config`] - resolved settings
//! - [`constants`] - fixed names and paths
//! - [`core`] - error types and terminal diagnostics
//! - [`utils`] - logging, atomic writes and platform helpers
//!
//! # Output
//!
//! ```json
//! [
//!   {
//!     "type": "file",
//!     "url": "https://repo.maven.apache.org/maven2/foo/bar/1.0/bar-1.0.jar",
//!     "dest": ".m2/repository/foo/bar/1.0",
//!     "dest-filename": "bar-1.0.jar",
//!     "sha512": "…"
//!   }
//! ]
//! ```
//!
//! Entries are sorted by URL so that regenerating against the same commit
//! produces an identical file.

pub mod build;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod maven;
pub mod process;
pub mod sandbox;
pub mod update;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
