//! Binary crate for the `weather-tracker` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive search and configuration prompts
//! - Human-friendly output formatting

use clap::Parser;
use env_logger::Env;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
