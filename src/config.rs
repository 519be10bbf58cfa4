//! Resolved run settings.
//!
//! [`Settings`] is built once from the command line (which also reads the
//! `FLATPAK_MAVEN_DEPS_*` environment variables) and handed to the pipeline.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MANIFEST, DEFAULT_MODULE, OUTPUT_FILE_NAME};

/// Settings for one updater run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The Flatpak manifest to read
    pub manifest_path: PathBuf,

    /// Module whose git source is built
    pub module: String,

    /// Forward `--verbose` when re-invoking inside the sandbox
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            module: DEFAULT_MODULE.to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Directory containing the manifest.
    ///
    /// A bare file name resolves to the current directory.
    #[must_use]
    pub fn manifest_dir(&self) -> &Path {
        match self.manifest_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// The sidecar file the dependency sources are written to.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.manifest_dir().join(OUTPUT_FILE_NAME)
    }
}
