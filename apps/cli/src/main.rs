//! founderlens CLI: founder extraction for company lists.
//!
//! Reads `Name (https://url)` lines, grounds each company with a snippet of
//! its website, asks a language model for the founders, and writes one
//! JSON results file.

mod commands;

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
