//! Command-line interface for countrydex.
//!
//! This module provides the CLI structure and the interactive browse session
//! for the `countrydex` binary.

mod commands;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BrowseCommand, ConfigCommand, FavouritesCommand, ListCommand, OutputFormat,
};

/// countrydex - Browse the world's countries
///
/// Fetches the country list from the REST Countries API, filters it by name
/// and region, and keeps a local list of favourites.
#[derive(Debug, Parser)]
#[command(name = "countrydex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch countries and print the filtered list
    List(ListCommand),

    /// Interactive session: filter and toggle favourites line by line
    Browse(BrowseCommand),

    /// Manage favourites without fetching
    #[command(subcommand)]
    Favourites(FavouritesCommand),

    /// Show the regions available for filtering
    Regions,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
