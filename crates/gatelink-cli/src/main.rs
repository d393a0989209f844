//! `gatelink` binary.

use anyhow::Result;
use clap::Parser;
use gatelink_cli::{Cli, DEFAULT_LOG_FILTER, run};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = match cli.log_level.as_deref() {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    println!("{}", run(&cli.command)?);
    Ok(())
}
