//! Type-safe command builder for the external tools the updater drives
//!
//! Every external process (git, the Maven wrapper, flatpak) is described by a
//! [`ProcessCommand`] before it is handed to a
//! [`CommandRunner`](super::CommandRunner). Keeping the description separate
//! from execution lets tests inspect exactly which commands a pipeline run
//! would issue without spawning anything.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::constants::{FAILURE_OUTPUT_TAIL_LINES, MAVEN_WRAPPER, OPENJDK_ENABLE_SCRIPT};
use crate::core::DepsError;

/// Builder describing one external command.
///
/// # Examples
///
/// ```rust,no_run
/// use flatpak_maven_deps::process::ProcessCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = ProcessCommand::new("git")
///     .args(["--version"])
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Output capture**: enabled
/// - **Working directory**: current process directory
/// - **Environment**: inherited from the parent process
/// - **Timeout**: none; a hung build hangs the run until interrupted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    /// Executable to run, looked up on `PATH` unless it contains a separator
    program: String,

    /// Arguments passed to the executable
    args: Vec<String>,

    /// Working directory for the child (defaults to the current directory)
    current_dir: Option<PathBuf>,

    /// Additional environment variables for the child
    env_vars: Vec<(String, String)>,

    /// Whether to capture output (true) or inherit stdio (false)
    capture_output: bool,

    /// Optional context string for log messages
    context: Option<String>,
}

impl ProcessCommand {
    /// Creates a builder for `program` with no arguments and captured output.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            capture_output: true,
            context: None,
        }
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Lets the child write directly to the terminal.
    ///
    /// Used for long-running commands whose progress the user should see
    /// (clone, sandbox install). The returned output is empty.
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Sets a context label included in log messages.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    #[must_use]
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env_vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub const fn captures_output(&self) -> bool {
        self.capture_output
    }

    /// Returns the value of the first argument of the form `<prefix><value>`.
    ///
    /// ```rust
    /// use flatpak_maven_deps::process::ProcessCommand;
    ///
    /// let cmd = ProcessCommand::new("mvnw").arg("-Dmaven.repo.local=/tmp/repo");
    /// assert_eq!(cmd.arg_value("-Dmaven.repo.local="), Some("/tmp/repo"));
    /// ```
    #[must_use]
    pub fn arg_value(&self, prefix: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| arg.strip_prefix(prefix))
    }

    /// Shell-quoted command line, suitable for progress output and copy-paste.
    #[must_use]
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command and waits for it to finish.
    ///
    /// The child is killed if the returned future is dropped, so cancelling a
    /// run does not leave an orphaned build behind.
    ///
    /// # Errors
    ///
    /// - [`DepsError::ToolNotFound`] when the executable cannot be found
    /// - [`DepsError::CommandFailed`] on a non-zero exit, carrying stderr (or
    ///   the tail of stdout when stderr is empty)
    pub async fn execute(self) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let line = self.display_line();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        match self.context {
            Some(ref ctx) => tracing::debug!(target: "process", "({}) Executing command: {}", ctx, line),
            None => tracing::debug!(target: "process", "Executing command: {}", line),
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "process", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        if self.capture_output {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DepsError::ToolNotFound {
                    tool: self.program.clone(),
                }
                .into());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to execute {line}")),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "process",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "process", "Error: {}", stderr);
            }

            let failure_output = if stderr.trim().is_empty() {
                tail_lines(&stdout, FAILURE_OUTPUT_TAIL_LINES)
            } else {
                stderr
            };

            return Err(DepsError::CommandFailed {
                command: line,
                exit_code: output.status.code(),
                output: failure_output,
            }
            .into());
        }

        if !stderr.is_empty() {
            tracing::debug!(target: "process", "{}", stderr.trim());
        }
        tracing::trace!(target: "process", "Captured {} bytes of stdout", stdout.len());

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "process::perf", "{} took {:.2}s", self.program, elapsed.as_secs_f64());
        }

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }
}

/// Output of a successful command; both fields are empty when stdio was inherited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Quotes a single word for POSIX shells, leaving safe words unchanged.
#[must_use]
pub fn shell_quote(word: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c);
    if word.is_empty() {
        "''".to_string()
    } else if word.chars().all(is_safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r#"'"'"'"#))
    }
}

fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(count)..].join("\n")
}

// Convenience builders for the commands the updater runs

impl ProcessCommand {
    /// Shallow, non-interactive clone of a single commit.
    ///
    /// Prompts are disabled for both HTTPS credentials and SSH host keys: a
    /// prompt would block the run forever.
    pub fn git_clone_revision(url: &str, commit: &str, target: impl AsRef<Path>) -> Self {
        Self::new("git")
            .args(["-c", "advice.detachedHead=false", "clone", "--depth=1"])
            .arg(format!("--revision={commit}"))
            .arg(url)
            .arg(target.as_ref().display().to_string())
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_SSH_COMMAND", "ssh -o BatchMode=yes")
            .inherit_stdio()
            .with_context("clone")
    }

    /// `clean package` through the project's Maven wrapper against an isolated
    /// local repository.
    ///
    /// Batch mode disables coloured output, which keeps the log parseable.
    pub fn maven_package(source_dir: impl AsRef<Path>, local_repository: impl AsRef<Path>) -> Self {
        let source_dir = source_dir.as_ref();
        Self::new(source_dir.join(MAVEN_WRAPPER).display().to_string())
            .arg("-B")
            .arg(format!("-Dmaven.repo.local={}", local_repository.as_ref().display()))
            .args(["clean", "package"])
            .current_dir(source_dir)
            .with_context("build")
    }

    /// Non-interactive user installation of Flatpak refs.
    pub fn flatpak_install<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("flatpak")
            .args(["install", "--user", "--noninteractive", "--assumeyes"])
            .args(refs)
            .inherit_stdio()
            .with_context("sandbox")
    }

    /// Runs `script` with bash inside `sdk`, with network access and the given
    /// directories exposed.
    ///
    /// The OpenJDK extension is enabled before `script` runs.
    pub fn flatpak_run(sdk: &str, work_dir: &Path, extra_filesystems: &[String], script: &str) -> Self {
        let work_dir = work_dir.display().to_string();
        Self::new("flatpak")
            .args(["run", "--share=network", "--command=/bin/bash"])
            .arg(format!("--filesystem={work_dir}"))
            .args(extra_filesystems.iter().map(|fs| format!("--filesystem={fs}")))
            .arg(format!("--cwd={work_dir}"))
            .arg(sdk)
            .arg("-c")
            .arg(format!("source {OPENJDK_ENABLE_SCRIPT}; {script}"))
            .inherit_stdio()
            .with_context("sandbox")
    }
}
