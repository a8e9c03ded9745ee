//! CLI module.

pub mod commands;

use clap::{Parser, Subcommand};

/// Sync gateway API specifications into blob storage and a vector index.
#[derive(Debug, Parser)]
#[command(name = "specsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one sync pass over the API catalog
    Sync,

    /// Check reachability of the configured services
    Status,
}
