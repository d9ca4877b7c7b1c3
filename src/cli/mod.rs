//! CLI module - Command-line interface for tvcatalog
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// tvcatalog - TV series catalog API
#[derive(Parser)]
#[command(name = "tvcatalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Apply migrations and seed data, then exit
    Migrate,
}

pub use commands::*;
