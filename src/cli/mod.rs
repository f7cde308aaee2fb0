//! CLI module
//!
//! Command-line interface for the loader.
//!
//! # Commands
//!
//! - `run` - Extract a month and load it into DuckDB
//! - `resources` - List catalog resources
//! - `window` - Show the half-open window for a month

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
