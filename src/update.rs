//! Regeneration of the Maven dependency sidecar file.
//!
//! [`run_direct`] is the whole pipeline on the host:
//!
//! 1. read the upstream source from the manifest,
//! 2. build it with an isolated local repository,
//! 3. extract and classify every downloaded artifact from the build log,
//! 4. turn each artifact into a checksummed Flatpak source,
//! 5. sort by URL and write `maven-dependencies.json` next to the manifest.
//!
//! The file is only written after every artifact was processed; any failure
//! leaves the previous file untouched.

use anyhow::{Context, Result};
use std::path::Path;

use crate::build::BuildOrchestrator;
use crate::config::Settings;
use crate::manifest::{FlatpakManifest, UpstreamSource};
use crate::maven::{PackagedArtifactSource, create_flatpak_source, extract_downloaded_artifacts};
use crate::process::CommandRunner;
use crate::utils::fs::safe_write;

/// Builds `source` and returns the Flatpak sources of every artifact the build
/// downloaded, sorted by URL.
///
/// Artifacts downloaded more than once appear once per download.
pub async fn update_dependencies<R: CommandRunner>(
    runner: &R,
    source: &UpstreamSource,
) -> Result<Vec<PackagedArtifactSource>> {
    let capture = BuildOrchestrator::new(runner).build(source).await?;

    let mut sources = extract_downloaded_artifacts(&capture.stdout_text)?
        .iter()
        .map(|artifact| create_flatpak_source(&capture.local_cache_root, artifact))
        .collect::<Result<Vec<_>>>()?;

    sources.sort_by(|a, b| a.url.cmp(&b.url));
    tracing::info!(target: "update", "Collected {} Maven artifacts", sources.len());
    Ok(sources)
}

/// Serializes `sources` as a pretty-printed JSON array and replaces `target`.
pub fn write_sources(target: &Path, sources: &[PackagedArtifactSource]) -> Result<()> {
    let json = serde_json::to_string_pretty(sources).context("Failed to serialize dependency sources")?;
    safe_write(target, &json).with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(target: "update", "Wrote {} sources to {}", sources.len(), target.display());
    Ok(())
}

/// Runs the full pipeline on the host.
pub async fn run_direct<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<()> {
    let manifest = FlatpakManifest::load(&settings.manifest_path)?;
    let source = manifest.git_source(&settings.module)?;
    let sources = update_dependencies(runner, &source).await?;
    write_sources(&settings.output_path(), &sources)
}
