//! Command-line interface for the Wayfarer travel planner.
//!
//! Every invocation opens the configured SQLite database, seeds it on first
//! use, runs one command and prints its result as JSON (or HTML for
//! `marker`).
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod config;
mod error;
mod maps;
mod marker;
mod output;
mod pois;
mod saved;

pub use error::CliError;

use config::{GlobalArgs, StoreArgs};
use maps::{MapsCommand, run_maps};
use marker::{MarkerArgs, run_marker};
use pois::{PoisCommand, run_pois};
use saved::{SavedCommand, run_saved};

/// Run the Wayfarer CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &mut stdout)
}

fn run_with(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = StoreArgs::from(cli.store).into_config()?;
    config.validate_sources()?;
    let planner = config.open_planner()?;
    match cli.command {
        Command::Pois { command } => run_pois(command, &planner, writer),
        Command::Maps { command } => run_maps(command, &planner, writer),
        Command::Saved { command } => run_saved(command, &planner, writer),
        Command::Marker(args) => run_marker(&args, &planner, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer",
    about = "Plan trips over a catalog of points of interest",
    version
)]
struct Cli {
    #[command(flatten)]
    store: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse and edit the POI catalog.
    Pois {
        #[command(subcommand)]
        command: PoisCommand,
    },
    /// Manage trips.
    Maps {
        #[command(subcommand)]
        command: MapsCommand,
    },
    /// Manage the POIs saved on a trip.
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
    /// Render the map marker for a POI.
    Marker(MarkerArgs),
}

#[cfg(test)]
mod tests;
