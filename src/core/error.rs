//! Error handling for the dependency updater
//!
//! Every failure the updater can hit is a variant of [`DepsError`]. Operations
//! return [`anyhow::Result`] and wrap these variants, so context can be layered
//! on with [`anyhow::Context`] while the top-level boundary can still recover
//! the typed error through downcasting.
//!
//! # Error Categories
//!
//! - **Lookup**: a manifest marker or field was not found
//!   ([`DepsError::ModuleNotFound`], [`DepsError::SdkNotFound`], ...)
//! - **Classification**: a downloaded artifact came from an unknown repository
//!   ([`DepsError::UnknownRepository`])
//! - **Process**: an external command failed, is missing or cannot be run in
//!   the sandbox ([`DepsError::CommandFailed`], [`DepsError::ToolNotFound`],
//!   [`DepsError::ReservedSandboxPath`])
//! - **Filesystem**: the local cache disagrees with the build log, or I/O failed
//!   ([`DepsError::ArtifactMissing`], [`DepsError::IoError`])
//! - **Lifecycle**: startup guard and interruption
//!   ([`DepsError::RunningAsRoot`], [`DepsError::Interrupted`])
//!
//! None of these are recovered. [`user_friendly_error`] turns whatever reached
//! the top level into an [`ErrorContext`] for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use flatpak_maven_deps::core::{DepsError, user_friendly_error};
//!
//! let error = anyhow::Error::from(DepsError::UnknownRepository {
//!     url: "https://example.com/foo.jar".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`DepsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required manifest marker or field was not found.
    Lookup,
    /// An artifact URL is not from a known repository.
    Classification,
    /// An external command failed or could not be started.
    Process,
    /// The filesystem does not match what the build reported.
    Filesystem,
    /// Startup guard or user interruption.
    Lifecycle,
}

/// All failures of the dependency updater.
#[derive(Error, Debug)]
pub enum DepsError {
    /// The `- name: <module>` marker is missing from the manifest.
    #[error("{module} module not found")]
    ModuleNotFound {
        /// Name of the module that was searched for
        module: String,
    },

    /// No `- type: git` source follows the module marker.
    #[error("git source not found")]
    GitSourceNotFound {
        /// Name of the module whose source was searched for
        module: String,
    },

    /// The git source lacks a `url:` or `commit:` line.
    #[error("url or commit not found in main {module} source")]
    SourceFieldsMissing {
        /// Name of the module whose source was incomplete
        module: String,
    },

    #[error("Failed to find sdk or runtime-version in manifest")]
    SdkNotFound,

    #[error("Manifest not found: {path}")]
    ManifestNotFound {
        /// Path that was expected to hold the manifest
        path: String,
    },

    /// A downloaded artifact came from a repository outside the allow-list.
    #[error("{url} is not from a known Maven repository")]
    UnknownRepository {
        /// The offending artifact URL
        url: String,
    },

    /// An external command exited unsuccessfully.
    #[error("Command {command} failed with exit code {}", format_exit_code(.exit_code))]
    CommandFailed {
        /// Shell-quoted command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        exit_code: Option<i32>,
        /// Captured error output, empty when stdio was inherited
        output: String,
    },

    #[error("{tool} is not installed or not found in PATH")]
    ToolNotFound {
        /// Name of the missing executable
        tool: String,
    },

    /// The build logged a download but left nothing in the local cache.
    #[error("Artifact {url} was downloaded but is missing from the local repository at {path}")]
    ArtifactMissing {
        /// URL the build reported as downloaded
        url: String,
        /// Where the artifact was expected on disk
        path: String,
    },

    #[error("Do not run this as root!")]
    RunningAsRoot,

    #[error("Interrupted, dependencies not updated!")]
    Interrupted,

    /// The executable lives where Flatpak refuses to mount host paths.
    #[error("{path} cannot be exposed inside the Flatpak sandbox")]
    ReservedSandboxPath {
        /// Host directory that would have to be mounted
        path: String,
    },

    /// Reading or writing a file failed; the path is in the surrounding context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

fn format_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |code| code.to_string())
}

impl DepsError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ModuleNotFound {
                ..
            }
            | Self::GitSourceNotFound {
                ..
            }
            | Self::SourceFieldsMissing {
                ..
            }
            | Self::SdkNotFound
            | Self::ManifestNotFound {
                ..
            } => ErrorCategory::Lookup,
            Self::UnknownRepository {
                ..
            } => ErrorCategory::Classification,
            Self::CommandFailed {
                ..
            }
            | Self::ToolNotFound {
                ..
            }
            | Self::ReservedSandboxPath {
                ..
            } => ErrorCategory::Process,
            Self::ArtifactMissing {
                ..
            }
            | Self::IoError(_) => ErrorCategory::Filesystem,
            Self::RunningAsRoot
            | Self::Interrupted
            | Self::Other {
                ..
            } => ErrorCategory::Lifecycle,
        }
    }
}

/// An error decorated with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepsError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Additional information, e.g. captured command output
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: DepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}", details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error reaching the top level into a displayable [`ErrorContext`].
///
/// A [`DepsError`] anywhere in the chain wins over the outer context, so the
/// terminal diagnostic always names the actual failure (the failing command,
/// the unknown URL, ...). Other errors, and [`DepsError::IoError`] whose
/// context carries the path, keep their full `anyhow` chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(deps_error) = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DepsError>())
        .filter(|deps_error| !matches!(deps_error, DepsError::IoError(_)))
    {
        return create_error_context(deps_error);
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DepsError::Other {
        message,
    })
}

fn create_error_context(error: &DepsError) -> ErrorContext {
    match error {
        DepsError::CommandFailed {
            command,
            exit_code,
            output,
        } => {
            let ctx = ErrorContext::new(DepsError::CommandFailed {
                command: command.clone(),
                exit_code: *exit_code,
                output: output.clone(),
            });
            if output.trim().is_empty() { ctx } else { ctx.with_details(output.trim_end()) }
        }

        DepsError::ToolNotFound {
            tool,
        } => ErrorContext::new(DepsError::ToolNotFound {
            tool: tool.clone(),
        })
        .with_suggestion(format!("Install {tool} with your package manager and make sure it is on PATH")),

        DepsError::UnknownRepository {
            url,
        } => ErrorContext::new(DepsError::UnknownRepository {
            url: url.clone(),
        })
        .with_suggestion("Add the repository to the list of known Maven repositories if it is trustworthy"),

        DepsError::ArtifactMissing {
            url,
            path,
        } => ErrorContext::new(DepsError::ArtifactMissing {
            url: url.clone(),
            path: path.clone(),
        })
        .with_details("The build log and the local Maven repository disagree; the build tool may have relocated the artifact"),

        DepsError::ManifestNotFound {
            path,
        } => ErrorContext::new(DepsError::ManifestNotFound {
            path: path.clone(),
        })
        .with_suggestion("Pass the Flatpak manifest with --manifest or run from the manifest directory"),

        DepsError::ReservedSandboxPath {
            path,
        } => ErrorContext::new(DepsError::ReservedSandboxPath {
            path: path.clone(),
        })
        .with_suggestion("Install update-dependencies outside the system directories, or run it without --flatpak"),

        other => ErrorContext::new(DepsError::Other {
            message: other.to_string(),
        }),
    }
}
