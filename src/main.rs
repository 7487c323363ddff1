//! # Guild Admin
//!
//! Command-line administration of a workspace snapshot.
//!
//! This is the application entry point that initializes:
//! - Configuration loading
//! - Tracing/logging subsystem
//! - The workspace session
//! - One command run, with the snapshot saved afterwards

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use guild_admin::config::Settings;
use guild_admin::presentation::cli::Cli;
use guild_admin::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment and config files
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    let log_dir = (!settings.logging.dir.is_empty()).then(|| PathBuf::from(&settings.logging.dir));
    guild_admin::telemetry::init_tracing(&settings.logging.level, log_dir.as_deref())?;

    info!(
        environment = %settings.environment,
        snapshot = %settings.workspace.snapshot_file,
        "Configuration loaded"
    );

    let mutating = cli.command.is_mutating();
    let application = Application::build(settings, cli.snapshot)?;

    // Save even when the command failed part-way; earlier mutations stick.
    let result = application.run(cli.command).await;
    if mutating {
        application.save()?;
    }

    print!("{}", result?);
    Ok(())
}
