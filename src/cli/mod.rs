//! CLI module for the Snipe-IT reconciliation modules.
//!
//! One subcommand per resource kind, each printing a single module result.

mod commands;
mod output;

pub use commands::{
    CategoryFlags, Cli, Commands, ConnectionFlags, EntryFlags, ModelFlags, OutputFormat,
};
pub use output::OutputFormatter;
