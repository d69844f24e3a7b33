mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod render;

use clap::Parser;
use colored::Colorize;
use log::debug;
use log::info;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::config::HopfoldConfig;
use crate::error::Result;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet)?;
    info!("hopfold v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}.", path.display());
            HopfoldConfig::load(path)?
        }
        None => HopfoldConfig::default(),
    };

    match cli.command {
        Commands::Fold(args) => {
            info!("Dispatching to 'fold' command.");
            commands::fold::run(args, &config).map(|_| ())
        }
        Commands::Layout(args) => {
            info!("Dispatching to 'layout' command.");
            commands::layout::run(args, &config).map(|_| ())
        }
        Commands::Train(args) => {
            info!("Dispatching to 'train' command.");
            commands::train::run(args, &config).map(|_| ())
        }
    }
}
