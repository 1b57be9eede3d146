//! corpus-uploader entry point.

mod adapter;
mod app;
mod cli;
mod config;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries progress and results.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting corpus-uploader");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli))
}
