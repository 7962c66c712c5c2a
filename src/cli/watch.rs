//! Watch subcommand: run the reload scheduler in the foreground.

use crate::format::OutputFormat;
use clap::Args;

/// Arguments for the watch subcommand
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Format of the status printed at start and on every cadence change
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}
