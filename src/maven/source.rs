//! Flatpak `file` sources for Maven artifacts.
//!
//! Each artifact the build downloaded becomes one entry of the sidecar file:
//!
//! ```json
//! {
//!   "type": "file",
//!   "url": "https://repo.maven.apache.org/maven2/foo/bar/1.0/bar-1.0.jar",
//!   "dest": ".m2/repository/foo/bar/1.0",
//!   "dest-filename": "bar-1.0.jar",
//!   "sha512": "…"
//! }
//! ```
//!
//! `flatpak-builder` downloads the URL, verifies the checksum and places the
//! file where Maven's offline build will look for it.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::ArtifactReference;
use crate::constants::{LOCAL_REPOSITORY_PREFIX, MAVEN_METADATA_FILE, MAVEN_METADATA_VARIANT_PATTERN};
use crate::core::DepsError;
use crate::utils::platform::normalize_path_for_storage;

/// A Maven artifact as a Flatpak `file` source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "file")]
pub struct PackagedArtifactSource {
    /// Where to download the artifact from
    pub url: String,

    /// Directory to place the artifact in, relative to the build directory
    #[serde(rename = "dest")]
    pub dest_dir: String,

    /// File name to store the artifact under
    #[serde(rename = "dest-filename")]
    pub dest_filename: String,

    /// Lowercase hex SHA-512 of the artifact
    #[serde(rename = "sha512")]
    pub content_hash: String,
}

/// Creates the Flatpak source for `artifact` from the local repository at
/// `repo`.
///
/// The destination file name is the artifact's own name, except for
/// `maven-metadata.xml`: when a versioned `maven-metadata-*.xml` sibling exists
/// in the cache its name is used instead (the first one in lexicographic
/// order), since only the versioned name is stable enough to redistribute.
///
/// # Errors
///
/// [`DepsError::ArtifactMissing`] if the build logged the download but the
/// file is not in the local repository, or any I/O error while hashing.
pub fn create_flatpak_source(repo: &Path, artifact: &ArtifactReference) -> Result<PackagedArtifactSource> {
    let cached = repo.join(artifact.relative_path());
    if !cached.is_file() {
        return Err(DepsError::ArtifactMissing {
            url: artifact.url().to_string(),
            path: cached.display().to_string(),
        }
        .into());
    }

    let file_name = cached.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    let dest_filename = if file_name == MAVEN_METADATA_FILE {
        match cached.parent().map(find_versioned_metadata).transpose()?.flatten() {
            Some(versioned) => {
                tracing::debug!(target: "maven", "Using {} for {}", versioned, artifact.url());
                versioned
            }
            None => file_name,
        }
    } else {
        file_name
    };

    Ok(PackagedArtifactSource {
        url: artifact.url().to_string(),
        dest_dir: destination_dir(artifact.relative_path()),
        dest_filename,
        content_hash: compute_sha512(&cached)?,
    })
}

/// The directory, relative to the build directory, where Maven expects the
/// artifact at `relative_path` in its local repository.
fn destination_dir(relative_path: &str) -> String {
    let in_repository = Path::new(LOCAL_REPOSITORY_PREFIX).join(relative_path);
    let parent = in_repository.parent().map_or_else(|| PathBuf::from(LOCAL_REPOSITORY_PREFIX), Path::to_path_buf);
    normalize_path_for_storage(parent)
}

/// First file in `dir` matching `maven-metadata-*.xml`, by name.
fn find_versioned_metadata(dir: &Path) -> Result<Option<String>> {
    let pattern = Pattern::new(MAVEN_METADATA_VARIANT_PATTERN)
        .with_context(|| format!("Invalid metadata pattern {MAVEN_METADATA_VARIANT_PATTERN}"))?;

    let mut candidates = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(DepsError::from)
        .with_context(|| format!("Failed to list directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry
            .map_err(DepsError::from)
            .with_context(|| format!("Failed to read entry in: {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if pattern.matches(&name) && entry.path().is_file() {
            candidates.push(name);
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Computes the lowercase hex SHA-512 of the file at `path`.
///
/// # Examples
///
/// ```rust,no_run
/// use flatpak_maven_deps::maven::compute_sha512;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let digest = compute_sha512(Path::new("bar-1.0.jar"))?;
/// assert_eq!(digest.len(), 128);
/// # Ok(())
/// # }
/// ```
pub fn compute_sha512(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha512};

    let content = fs::read(path)
        .map_err(DepsError::from)
        .with_context(|| format!("Cannot read file for checksum calculation: {}", path.display()))?;

    let mut hasher = Sha512::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}
