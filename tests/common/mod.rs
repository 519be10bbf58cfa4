//! Shared helpers for the integration tests.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use flatpak_maven_deps::config::Settings;
use flatpak_maven_deps::test_utils::fixtures::write_manifest;

/// A temporary packaging directory holding the fixture manifest.
pub struct TestProject {
    dir: TempDir,
    manifest: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let manifest = write_manifest(dir.path())?;
        Ok(Self {
            dir,
            manifest,
        })
    }

    /// A project whose manifest is `text` instead of the fixture.
    pub fn with_manifest(text: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let manifest = dir.path().join("app.yaml");
        std::fs::write(&manifest, text)?;
        Ok(Self {
            dir,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn settings(&self) -> Settings {
        Settings::new(&self.manifest)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("maven-dependencies.json")
    }

    pub fn read_output(&self) -> Result<String> {
        Ok(std::fs::read_to_string(self.output_path())?)
    }

    pub fn read_output_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.read_output()?)?)
    }
}
