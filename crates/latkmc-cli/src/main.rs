mod cli;
mod commands;
mod config;
mod error;
mod hexgrid;
mod logging;
mod progress;
mod render;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("latkmc v{} starting up", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
    }
}
