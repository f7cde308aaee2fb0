//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Monthly bronze-layer loader for the SpaceX v4 API
#[derive(Parser, Debug)]
#[command(name = "bronze-loader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract one month and load it into the bronze tables
    Run {
        /// Calendar year
        #[arg(long)]
        year: i32,

        /// Calendar month (1-12)
        #[arg(long)]
        month: u32,

        /// Resources to run (comma-separated, empty = all)
        #[arg(long, value_delimiter = ',')]
        resources: Vec<String>,

        /// DuckDB database file
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Schema the tables are created in
        #[arg(long)]
        dataset: Option<String>,

        /// API root URL
        #[arg(long)]
        base_url: Option<String>,

        /// Records requested per page
        #[arg(long)]
        page_limit: Option<u32>,
    },

    /// List the resources in the catalog
    Resources,

    /// Show the extraction window of a month
    Window {
        /// Calendar year
        #[arg(long)]
        year: i32,

        /// Calendar month (1-12)
        #[arg(long)]
        month: u32,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}
