//! orbit - approved-package discovery CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use orbit_cli::cmd;
use orbit_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `orbit discover` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.discovery.to_config()?;

    match cli.command {
        Commands::Serve { bind } => cmd::serve::serve(config, bind).await,
        Commands::Discover { report } => cmd::discover::discover(&config, report).await,
    }
}
