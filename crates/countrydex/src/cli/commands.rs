//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::Filter;
use crate::render::Format;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only countries whose name contains this text (case-insensitive)
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Only countries in this region (exact match, e.g. "Europe")
    #[arg(short, long)]
    pub region: Option<String>,

    /// Only favourited countries
    #[arg(short, long)]
    pub favourites_only: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// The filter described by these arguments.
    #[must_use]
    pub fn filter(&self) -> Filter {
        Filter {
            query: self.search.clone().unwrap_or_default(),
            region: self.region.clone(),
            favourites_only: self.favourites_only,
        }
    }
}

/// Browse command arguments.
#[derive(Debug, Args)]
pub struct BrowseCommand {
    /// Output format for each redraw
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Favourites management commands.
#[derive(Debug, Subcommand)]
pub enum FavouritesCommand {
    /// List favourited country codes
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a country to favourites, or remove it if already there
    Toggle {
        /// Two-letter country code (e.g. FI)
        code: String,
    },

    /// Remove all favourites
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One card per country
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

impl From<OutputFormat> for Format {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Plain => Self::Cards,
            OutputFormat::Table => Self::Table,
            OutputFormat::Json => Self::Json,
        }
    }
}
