//! ProfileScout CLI: public profile extraction from the command line.
//!
//! Fetches a profile page, reconciles its embedded data sources into one
//! record and reports any contact details found in the free text. Can also
//! run as a small HTTP service.

mod commands;
mod server;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
