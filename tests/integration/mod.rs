//! Integration test suite for flatpak-maven-deps
//!
//! These tests drive the whole pipeline through the public API with a scripted
//! command runner, so they need neither network access nor git, Maven or
//! flatpak.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: manifest to sidecar file, ordering, idempotence and failures
//! - **cli**: the `update-dependencies` binary's argument handling

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod pipeline;
