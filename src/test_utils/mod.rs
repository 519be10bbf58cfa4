//! Test utilities
//!
//! [`RecordingRunner`] stands in for git, Maven and flatpak so the pipeline
//! can be exercised end to end without network access or external tools. It
//! records every command it receives and, when asked to run the Maven build,
//! fabricates the local repository content and build log it was scripted with.
//!
//! # Example
//!
//! ```rust,no_run
//! use flatpak_maven_deps::test_utils::RecordingRunner;
//!
//! let runner = RecordingRunner::new()
//!     .with_artifact("foo/bar/1.0/bar-1.0.jar", b"jar bytes");
//! // The build log now contains a matching "Downloaded from" line
//! ```

pub mod fixtures;

pub use crate::utils::logging::init_test_logging;
pub use fixtures::MANIFEST;

use anyhow::Result;
use std::path::Path;
use std::sync::Mutex;

use crate::core::DepsError;
use crate::maven::REPO_BASES;
use crate::process::{CommandOutput, CommandRunner, ProcessCommand};

const LOCAL_REPOSITORY_ARG: &str = "-Dmaven.repo.local=";

/// Scripted [`CommandRunner`] that records the commands it receives.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<ProcessCommand>>,
    build_log: String,
    artifacts: Vec<(String, Vec<u8>)>,
    failing_program: Option<String>,
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw text to the build log.
    #[must_use]
    pub fn with_build_log(mut self, log: &str) -> Self {
        self.build_log.push_str(log);
        self
    }

    /// Places `content` at `relative_path` in the local repository during the
    /// build and logs its download from Maven Central.
    #[must_use]
    pub fn with_artifact(self, relative_path: &str, content: &[u8]) -> Self {
        let url = format!("{}{relative_path}", REPO_BASES[0]);
        self.with_build_log(&format!("[INFO] Downloaded from central: {url} (1 kB at 10 kB/s)\n"))
            .with_cached_file(relative_path, content)
    }

    /// Places `content` at `relative_path` in the local repository during the
    /// build without logging anything.
    #[must_use]
    pub fn with_cached_file(mut self, relative_path: &str, content: &[u8]) -> Self {
        self.artifacts.push((relative_path.to_string(), content.to_vec()));
        self
    }

    /// Makes every command whose program ends with `program` fail.
    #[must_use]
    pub fn fail_on(mut self, program: &str) -> Self {
        self.failing_program = Some(program.to_string());
        self
    }

    /// The commands received so far, in order.
    pub fn commands(&self) -> Vec<ProcessCommand> {
        self.commands.lock().map(|commands| commands.clone()).unwrap_or_default()
    }

    /// The received commands as shell-quoted lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands().iter().map(ProcessCommand::display_line).collect()
    }

    fn populate_repository(&self, repo: &Path) -> Result<()> {
        for (relative_path, content) in &self.artifacts {
            let path = repo.join(relative_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: ProcessCommand) -> Result<CommandOutput> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.clone());
        }

        if self.failing_program.as_deref().is_some_and(|program| command.program().ends_with(program)) {
            return Err(DepsError::CommandFailed {
                command: command.display_line(),
                exit_code: Some(1),
                output: "scripted failure".to_string(),
            }
            .into());
        }

        match command.arg_value(LOCAL_REPOSITORY_ARG) {
            Some(repo) => {
                self.populate_repository(Path::new(repo))?;
                Ok(CommandOutput {
                    stdout: self.build_log.clone(),
                    stderr: String::new(),
                })
            }
            None => Ok(CommandOutput::default()),
        }
    }
}
