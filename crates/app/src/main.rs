//! Quay CLI - Main Entry Point

use clap::Parser;
use quay::logging::{self, LogFormat};
use quay::{Cli, Quay};
use quay_infrastructure::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(LogFormat::from_env());

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }

    tracing::debug!("quay v{}", env!("CARGO_PKG_VERSION"));

    let mut quay = Quay::connect(&config).await?;
    let output = quay::run(&mut quay, cli.command, cli.output).await?;
    println!("{output}");

    Ok(())
}
