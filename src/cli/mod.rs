//! CLI command definitions for hotprops
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod get;
pub mod show;
pub mod watch;

use clap::{Parser, Subcommand};
use get::GetArgs;
use show::ShowArgs;
use watch::WatchArgs;

/// Inspect and watch hot-reloadable property files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of the property file, may contain ${name} placeholders
    #[arg(short, long, global = true, value_name = "DIR")]
    pub config_path: Option<String>,

    /// Property file name inside the directory
    #[arg(short, long, global = true, value_name = "NAME")]
    pub file: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the property file once and print every entry
    Show(ShowArgs),

    /// Load the property file once and print one coerced value
    Get(GetArgs),

    /// Keep reloading the property file on its own cadence until Ctrl-C
    Watch(WatchArgs),

    /// Print the resolved property file path
    Resolve,
}
