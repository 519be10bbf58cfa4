//! Flatpak manifest introspection.
//!
//! The updater needs two facts from the Flatpak manifest: which upstream
//! commit to build ([`UpstreamSource`]) and which SDK the build runs on
//! ([`SdkIdentity`]). Both are found by line-oriented scanning rather than by
//! parsing YAML, which keeps the field-discovery rules explicit:
//!
//! - [`find_git_source`] walks forward only: first the `- name: <module>`
//!   marker, then the first `- type: git` line after it, then the first `url:`
//!   and `commit:` lines after that. It never backtracks, so with several
//!   modules or sources only the first reachable one is used.
//! - [`find_sdk`] takes the first top-level `sdk:` line and the first line
//!   starting with `runtime-version`.
//!
//! A manifest laid out differently fails with a lookup error rather than
//! silently yielding the wrong source.
//!
//! # Example manifest
//!
//! ```yaml
//! app-id: de.mediathekview.MediathekView
//! runtime: org.freedesktop.Platform
//! runtime-version: '24.08'
//! sdk: org.freedesktop.Sdk
//! modules:
//!   - name: mediathekview
//!     sources:
//!       - type: git
//!         url: https://github.com/mediathekview/MediathekView.git
//!         commit: 0123456789abcdef
//! ```


use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::DepsError;

/// Marker line opening a git source, compared after trimming.
pub const GIT_SOURCE_MARKER: &str = "- type: git";

/// The upstream revision a module is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSource {
    /// The git URL
    pub url: String,
    /// The commit to check out
    pub commit: String,
}

/// A Flatpak SDK by name and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkIdentity {
    pub name: String,
    pub version: String,
}

impl SdkIdentity {
    /// An SDK extension sharing this SDK's version.
    #[must_use]
    pub fn extension(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for SdkIdentity {
    /// Formats as a Flatpak ref, `name//version`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}//{}", self.name, self.version)
    }
}

/// A Flatpak manifest loaded as raw text.
#[derive(Debug, Clone)]
pub struct FlatpakManifest {
    path: PathBuf,
    text: String,
}

impl FlatpakManifest {
    /// Reads the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DepsError::ManifestNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let text = std::fs::read_to_string(path)
            .map_err(DepsError::from)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        tracing::debug!(target: "manifest", "Loaded manifest {} ({} bytes)", path.display(), text.len());
        Ok(Self::from_text(path, text))
    }

    /// Wraps already loaded manifest text.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// See [`find_git_source`].
    pub fn git_source(&self, module: &str) -> Result<UpstreamSource, DepsError> {
        find_git_source(&self.text, module)
    }

    /// See [`find_sdk`].
    pub fn sdk(&self) -> Result<SdkIdentity, DepsError> {
        find_sdk(&self.text)
    }
}

/// Finds the git source of `module` by a single forward scan.
///
/// # Errors
///
/// - [`DepsError::ModuleNotFound`] if no line trims to `- name: <module>`
/// - [`DepsError::GitSourceNotFound`] if no `- type: git` line follows it
/// - [`DepsError::SourceFieldsMissing`] if the input ends before both a `url:`
///   and a `commit:` line were seen
pub fn find_git_source(manifest: &str, module: &str) -> Result<UpstreamSource, DepsError> {
    let module_marker = format!("- name: {module}");
    let mut lines = manifest.lines().map(str::trim);

    if !lines.by_ref().any(|line| line == module_marker) {
        return Err(DepsError::ModuleNotFound {
            module: module.to_string(),
        });
    }
    if !lines.by_ref().any(|line| line == GIT_SOURCE_MARKER) {
        return Err(DepsError::GitSourceNotFound {
            module: module.to_string(),
        });
    }

    let mut url = None;
    let mut commit = None;
    for line in lines {
        if url.is_none() {
            url = field_value(line, "url");
        }
        if commit.is_none() {
            commit = field_value(line, "commit");
        }
        if let (Some(url), Some(commit)) = (&url, &commit) {
            tracing::debug!(target: "manifest", "Found source {} at {}", url, commit);
            return Ok(UpstreamSource {
                url: url.clone(),
                commit: commit.clone(),
            });
        }
    }

    Err(DepsError::SourceFieldsMissing {
        module: module.to_string(),
    })
}

/// Finds the SDK the manifest builds with.
///
/// Only top-level keys count: lines are matched without trimming, so nested
/// `sdk:` keys (for example inside a module's build options) are ignored.
///
/// # Errors
///
/// [`DepsError::SdkNotFound`] if either `sdk:` or `runtime-version` is missing.
pub fn find_sdk(manifest: &str) -> Result<SdkIdentity, DepsError> {
    let mut name = None;
    let mut version = None;

    for line in manifest.lines() {
        if name.is_none() && line.starts_with("sdk:") {
            name = line.split_once(':').map(|(_, value)| unquote(value)).filter(|v| !v.is_empty());
        } else if version.is_none() && line.starts_with("runtime-version") {
            version = line.split_once(':').map(|(_, value)| unquote(value)).filter(|v| !v.is_empty());
        }

        if let (Some(name), Some(version)) = (&name, &version) {
            return Ok(SdkIdentity {
                name: name.clone(),
                version: version.clone(),
            });
        }
    }

    Err(DepsError::SdkNotFound)
}

/// Value of a `key: value` line, `None` for other lines or empty values.
fn field_value(line: &str, key: &str) -> Option<String> {
    let value = line.strip_prefix(key)?.strip_prefix(':')?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches(|c| c == '\'' || c == '"').trim().to_string()
}
