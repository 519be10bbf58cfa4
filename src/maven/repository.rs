//! Known Maven repositories and artifact URL classification.

use crate::core::DepsError;

/// Base URLs of the Maven repositories artifacts may be fetched from.
///
/// Order matters: a URL is attributed to the first base it starts with.
pub const REPO_BASES: &[&str] = &[
    "https://repo.maven.apache.org/maven2/",
    "https://oss.sonatype.org/content/repositories/snapshots/",
    "https://maven.ej-technologies.com/repository/",
];

/// An artifact URL split into its repository base and repository path.
///
/// Only constructible through [`ArtifactReference::classify`], so every value
/// satisfies `url == repo_base + relative_path` with `repo_base` taken from
/// [`REPO_BASES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactReference {
    url: String,
    repo_base: &'static str,
    relative_path: String,
}

impl ArtifactReference {
    /// Classifies `url` against [`REPO_BASES`].
    ///
    /// # Errors
    ///
    /// [`DepsError::UnknownRepository`] when no known base is a prefix of
    /// `url`. An artifact from an unknown origin cannot be verified, so this
    /// is fatal rather than skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatpak_maven_deps::maven::ArtifactReference;
    ///
    /// let artifact = ArtifactReference::classify(
    ///     "https://repo.maven.apache.org/maven2/foo/bar/1.0/bar-1.0.jar",
    /// )?;
    /// assert_eq!(artifact.repo_base(), "https://repo.maven.apache.org/maven2/");
    /// assert_eq!(artifact.relative_path(), "foo/bar/1.0/bar-1.0.jar");
    /// # Ok::<(), flatpak_maven_deps::core::DepsError>(())
    /// ```
    pub fn classify(url: &str) -> Result<Self, DepsError> {
        REPO_BASES
            .iter()
            .copied()
            .find_map(|base| {
                url.strip_prefix(base).map(|relative_path| Self {
                    url: url.to_string(),
                    repo_base: base,
                    relative_path: relative_path.to_string(),
                })
            })
            .ok_or_else(|| DepsError::UnknownRepository {
                url: url.to_string(),
            })
    }

    /// The full artifact URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The repository base the URL belongs to.
    #[must_use]
    pub const fn repo_base(&self) -> &'static str {
        self.repo_base
    }

    /// The path of the artifact below [`repo_base`](Self::repo_base), which is
    /// also its path inside a Maven local repository.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }
}
