//! External process execution.
//!
//! The updater delegates all real work (fetching sources, building, installing
//! and entering the sandbox) to external tools. That delegation goes through
//! one seam, [`CommandRunner`]: "run this command, give me its output, fail on
//! a non-zero exit". [`SystemRunner`] is the real implementation; tests use a
//! scripted runner to exercise the pipeline without git, Maven or flatpak.

pub mod command_builder;

pub use command_builder::{CommandOutput, ProcessCommand, shell_quote};

use anyhow::Result;
use std::future::Future;

use crate::core::DepsError;

/// Runs external commands on behalf of the pipeline.
pub trait CommandRunner {
    /// Runs `command` to completion.
    ///
    /// Implementations must fail with [`DepsError::CommandFailed`] when the
    /// command exits unsuccessfully.
    fn run(&self, command: ProcessCommand) -> impl Future<Output = Result<CommandOutput>>;
}

/// Runs commands as child processes of the updater.
///
/// Each command line is printed to stdout before it starts so a run can be
/// audited and reproduced by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, command: ProcessCommand) -> Result<CommandOutput> {
        ensure_tool_available(command.program())?;
        println!("Running {}", command.display_line());
        command.execute().await
    }
}

/// Checks that `tool` can be found on `PATH`.
///
/// Programs given as a path (such as the Maven wrapper inside the checkout) are
/// not looked up; a missing file surfaces when the command is spawned.
pub fn ensure_tool_available(tool: &str) -> Result<()> {
    if tool.contains(std::path::MAIN_SEPARATOR) || tool.contains('/') {
        return Ok(());
    }
    which::which(tool).map_err(|_| DepsError::ToolNotFound {
        tool: tool.to_string(),
    })?;
    Ok(())
}
