//! Atomic file write operations using temp-and-rename strategy.

use super::ensure_dir;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Atomically writes a string to `path`.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to `path`, replacing any existing file.
///
/// The content is written and synced to a sibling temporary file which is then
/// renamed over the target. Parent directories are created as needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_safe_write() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("deps.json");

        safe_write(&file_path, "[]").unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("deps.json");

        std::fs::write(&file_path, "old content that is longer").unwrap();
        atomic_write(&file_path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "new");
        assert!(!temp.path().join("deps.tmp").exists());
    }

    #[test]
    fn test_safe_write_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("subdir").join("deps.json");

        safe_write(&file_path, "[]").unwrap();

        assert!(file_path.exists());
    }
}
