//! File system helpers.
//!
//! The sidecar file is the only durable output of a run, so it is always
//! written through [`atomic_write`]: an interrupted run leaves either the
//! previous file or the complete new one, never a truncated mix.

mod atomic;

pub use atomic::{atomic_write, safe_write};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Creates `path` and all missing parents.
///
/// Succeeds if the directory already exists, fails if `path` exists but is not
/// a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}
