//! Extraction of downloaded artifacts from a Maven build log.

use regex::Regex;
use std::sync::LazyLock;

use super::repository::ArtifactReference;
use crate::core::DepsError;

/// Matches `Downloaded from <repo>: <url>`; the URL is the first group.
static DOWNLOADED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Downloaded from .*: (https?://[^ ]+)").expect("download pattern is valid")
});

/// Extracts every downloaded artifact from `build_log`, in log order.
///
/// `Downloading from` progress lines are ignored; only completed downloads
/// count. Duplicates are kept: an artifact logged twice yields two equal
/// references.
///
/// # Errors
///
/// [`DepsError::UnknownRepository`] for the first download whose URL is not
/// from a known repository.
///
/// # Examples
///
/// ```rust
/// use flatpak_maven_deps::maven::extract_downloaded_artifacts;
///
/// let log = "[INFO] Downloaded from central: https://repo.maven.apache.org/maven2/a/b/1.0/b-1.0.jar (3 kB at 9 kB/s)";
/// let artifacts = extract_downloaded_artifacts(log)?;
/// assert_eq!(artifacts[0].relative_path(), "a/b/1.0/b-1.0.jar");
/// # Ok::<(), flatpak_maven_deps::core::DepsError>(())
/// ```
pub fn extract_downloaded_artifacts(build_log: &str) -> Result<Vec<ArtifactReference>, DepsError> {
    let artifacts = build_log
        .lines()
        .filter_map(|line| DOWNLOADED_RE.captures(line))
        .filter_map(|captures| captures.get(1))
        .map(|url| ArtifactReference::classify(url.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(target: "maven", "Found {} downloaded artifacts in build log", artifacts.len());
    Ok(artifacts)
}
