//! `update-dependencies` entry point.
//!
//! Parses the command line, runs the updater and turns any failure into a
//! one-line diagnostic and exit status 1.

use anyhow::Result;
use clap::Parser;
use flatpak_maven_deps::cli;
use flatpak_maven_deps::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
