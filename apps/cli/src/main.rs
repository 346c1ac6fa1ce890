//! WiseWays CLI: classify questions and group them into thinking rooms.
//!
//! Feeds question text into an in-memory question graph and prints the
//! resulting links, rooms and analytics.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
