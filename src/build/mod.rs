//! Isolated upstream builds.
//!
//! [`BuildOrchestrator::build`] clones the upstream commit into a fresh
//! temporary workspace and runs `mvnw clean package` against an empty local
//! repository inside that workspace. Starting from an empty repository is what
//! makes the build log complete: every dependency Maven needs must be
//! downloaded, and every download is logged. A pre-populated repository would
//! serve artifacts silently and they would be missing from the result.
//!
//! The workspace lives exactly as long as the returned [`BuildCapture`]; it is
//! removed on drop, including when the run fails or is interrupted.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::WORKDIR_PREFIX;
use crate::manifest::UpstreamSource;
use crate::process::{CommandRunner, ProcessCommand};

/// Output of an isolated build.
#[derive(Debug)]
pub struct BuildCapture {
    /// Everything the build wrote to stdout
    pub stdout_text: String,

    /// The local repository the build populated
    pub local_cache_root: PathBuf,

    workspace: TempDir,
}

impl BuildCapture {
    /// The temporary workspace holding the checkout and the local repository.
    #[must_use]
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }
}

/// Clones and builds an upstream source with an isolated Maven repository.
pub struct BuildOrchestrator<'a, R: CommandRunner> {
    runner: &'a R,
    workdir_prefix: String,
}

impl<'a, R: CommandRunner> BuildOrchestrator<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            workdir_prefix: WORKDIR_PREFIX.to_string(),
        }
    }

    /// Overrides the prefix of the temporary workspace directory.
    #[must_use]
    pub fn with_workdir_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.workdir_prefix = prefix.into();
        self
    }

    /// Clones `source` and runs `clean package` on it.
    ///
    /// Layout of the workspace:
    ///
    /// ```text
    /// <tmp>/<prefix>XXXXXX/
    /// ├── source/   shallow clone of the commit
    /// └── repo/     Maven local repository, empty before the build
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the workspace cannot be created or if the clone or the build
    /// exits unsuccessfully. Nothing is retried.
    pub async fn build(&self, source: &UpstreamSource) -> Result<BuildCapture> {
        let workspace = tempfile::Builder::new()
            .prefix(&self.workdir_prefix)
            .tempdir()
            .context("Failed to create temporary build workspace")?;
        tracing::debug!(target: "build", "Building {} at {} in {}", source.url, source.commit, workspace.path().display());

        let source_dir = workspace.path().join("source");
        self.runner
            .run(ProcessCommand::git_clone_revision(&source.url, &source.commit, &source_dir))
            .await
            .with_context(|| format!("Failed to clone {} at {}", source.url, source.commit))?;

        let repo_dir = workspace.path().join("repo");
        std::fs::create_dir(&repo_dir)
            .with_context(|| format!("Failed to create local repository: {}", repo_dir.display()))?;

        let output = self
            .runner
            .run(ProcessCommand::maven_package(&source_dir, &repo_dir))
            .await
            .context("Maven build failed")?;
        tracing::debug!(target: "build", "Build produced {} lines of output", output.stdout.lines().count());

        Ok(BuildCapture {
            stdout_text: output.stdout,
            local_cache_root: repo_dir,
            workspace,
        })
    }
}
