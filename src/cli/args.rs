//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, import::ImportArgs, init::InitArgs,
    report::ReportCommands, status::StatusArgs, table::TableCommands, tables::TablesArgs,
};

#[derive(Parser)]
#[command(name = "autoparts")]
#[command(author, version, about = "Auto-parts store inventory, sales and reports")]
#[command(long_about = "Browse, search and edit the tables of an auto-parts store and run its analytical reports. Data lives in a SQLite database under .autoparts/.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbose logging (-v for info, -vv for debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Database file (default: auto-detect by finding .autoparts/)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new store in a directory
    Init(InitArgs),

    /// List the tables that can be browsed and edited
    Tables(TablesArgs),

    /// Browse, search and edit one table
    #[command(subcommand)]
    Table(TableCommands),

    /// List and run analytical reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Insert records from a CSV file
    Import(ImportArgs),

    /// Show record counts and schema version
    Status(StatusArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (aligned table, key/value for show)
    #[default]
    Auto,
    /// Tab-aligned columns (for terminals)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// JSON format (for programming)
    Json,
    /// Just record keys, one per line
    Id,
}
