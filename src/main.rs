mod checker;
mod cli;
mod config;
mod dirs;
mod error;
mod flatpak;
mod pacman;
mod setup;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments first to check verbose flag
    let args = cli::Args::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_target(false)
        .init();

    cli::execute(args).await?;

    Ok(())
}
