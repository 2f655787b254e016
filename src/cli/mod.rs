//! CLI module - Command-line interface for Seasonarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::Season;

/// Seasonarr - Seasonal anime catalog harvester
/// Builds per-season datasets and a manifest from the Bangumi catalog
#[derive(Parser)]
#[command(name = "seasonarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a single season
    #[command(alias = "s")]
    Season {
        /// Year to fetch
        #[arg(long)]
        year: i32,
        /// Season to fetch (winter, spring, summer, fall)
        #[arg(long)]
        season: Season,
    },

    /// Fetch all four seasons of the current year
    #[command(alias = "all-current")]
    Current,

    /// Fetch every season from the start year through the current year
    #[command(alias = "all-history")]
    History {
        /// First year to fetch (default: history.start_year from config)
        #[arg(long)]
        from: Option<i32>,
    },

    /// Show the seasons recorded in the manifest
    #[command(alias = "ls")]
    Manifest,

    /// Create default config file
    Init,
}

pub use commands::*;
