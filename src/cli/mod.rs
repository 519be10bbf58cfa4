//! Command-line interface for `update-dependencies`.
//!
//! The binary has a single job, so there are no subcommands: it regenerates
//! `maven-dependencies.json` next to the Flatpak manifest, either directly on
//! the host or, with `--flatpak`, inside the manifest's SDK.
//!
//! # Usage
//!
//! ```bash
//! # Build on the host (needs git and a JDK)
//! update-dependencies
//!
//! # Build inside the Flatpak SDK (needs only flatpak)
//! update-dependencies --flatpak
//!
//! # Another manifest or module
//! update-dependencies --manifest path/to/app.yaml --module app
//! ```
//!
//! # Environment Variables
//!
//! - `FLATPAK_MAVEN_DEPS_MANIFEST` - default for `--manifest`
//! - `FLATPAK_MAVEN_DEPS_MODULE` - default for `--module`
//! - `RUST_LOG` - overrides the log filter chosen by `--verbose`/`--quiet`
//!
//! # Lifecycle
//!
//! Before anything runs the process refuses to continue as root. The pipeline
//! then races Ctrl-C: an interrupt drops the pipeline, which kills running
//! child processes and removes the temporary build workspace, and the run
//! fails with [`DepsError::Interrupted`]. The sidecar file is only ever
//! replaced as a whole, so an interrupted run leaves the previous one intact.


use anyhow::Result;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use tracing::Level;

use crate::config::Settings;
use crate::constants::{DEFAULT_MANIFEST, DEFAULT_MODULE};
use crate::core::DepsError;
use crate::process::SystemRunner;
use crate::sandbox::run_in_flatpak;
use crate::update::run_direct;
use crate::utils::logging::init_logging;
use crate::utils::platform::ensure_not_root;

/// Regenerate the Maven dependency sources of a Flatpak manifest.
#[derive(Parser, Debug)]
#[command(
    name = "update-dependencies",
    about = "Regenerate maven-dependencies.json for a Flatpak manifest",
    version,
    long_about = "Builds the manifest's upstream source with an empty Maven repository, \
                  collects every artifact the build downloaded and writes them as \
                  checksummed Flatpak file sources to maven-dependencies.json."
)]
pub struct Cli {
    /// Run the update inside the manifest's Flatpak SDK.
    ///
    /// Installs the SDK and its OpenJDK extension for the current user and
    /// re-runs this program inside the sandbox with network access.
    #[arg(long)]
    pub flatpak: bool,

    /// Path to the Flatpak manifest; the output is written next to it.
    #[arg(long, env = "FLATPAK_MAVEN_DEPS_MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Manifest module whose git source is built.
    #[arg(long, env = "FLATPAK_MAVEN_DEPS_MODULE", default_value = DEFAULT_MODULE)]
    pub module: String,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable all logging; progress lines and errors are still printed.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by the verbosity flags; `None` means no logging.
    #[must_use]
    pub const fn log_level(&self) -> Option<Level> {
        if self.verbose {
            Some(Level::DEBUG)
        } else if self.quiet {
            None
        } else {
            Some(Level::WARN)
        }
    }

    /// Settings for the pipeline, resolved from the parsed arguments.
    #[must_use]
    pub fn build_settings(&self) -> Settings {
        Settings {
            manifest_path: self.manifest.clone(),
            module: self.module.clone(),
            verbose: self.verbose,
        }
    }

    /// Runs the updater.
    ///
    /// # Errors
    ///
    /// [`DepsError::RunningAsRoot`] before anything else is done,
    /// [`DepsError::Interrupted`] on Ctrl-C, or whatever the pipeline failed
    /// with.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_level());
        ensure_not_root()?;

        let settings = self.build_settings();
        tracing::debug!(target: "cli", "Running with {:?}", settings);

        let runner = SystemRunner;
        if self.flatpak {
            until_interrupted(run_in_flatpak(&runner, &settings), tokio::signal::ctrl_c()).await
        } else {
            until_interrupted(run_direct(&runner, &settings), tokio::signal::ctrl_c()).await
        }
    }
}

/// Drives `pipeline` to completion unless `interrupt` resolves first, in which
/// case the pipeline is dropped and the run fails with
/// [`DepsError::Interrupted`].
pub async fn until_interrupted<P, I, E>(pipeline: P, interrupt: I) -> Result<()>
where
    P: Future<Output = Result<()>>,
    I: Future<Output = std::result::Result<(), E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    tokio::select! {
        result = pipeline => result,
        signal = interrupt => {
            signal?;
            tracing::debug!(target: "cli", "Interrupt received, aborting");
            Err(DepsError::Interrupted.into())
        }
    }
}
