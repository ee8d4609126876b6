//! Command-line parsing for the automobile sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::ReportCategory;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autodash", version, about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the four report views for one selection.
    Report(ReportArgs),
    /// Launch the interactive dashboard.
    Tui(SourceArgs),
}

/// Where to read the dataset from.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Local CSV file to load instead of downloading the dataset.
    #[arg(short = 'f', long = "data", value_name = "CSV", conflicts_with = "url")]
    pub data: Option<PathBuf>,

    /// Dataset URL (overrides SALES_DATA_URL).
    #[arg(long)]
    pub url: Option<String>,
}

/// Report category as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Yearly,
    Recession,
}

impl From<CategoryArg> for ReportCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Yearly => ReportCategory::YearlyStatistics,
            CategoryArg::Recession => ReportCategory::RecessionStatistics,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report category. Without it only the placeholder is printed.
    #[arg(short = 'c', long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Year for yearly statistics (ignored for recession statistics).
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// Render ASCII plots for line views.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,

    /// Export the composed bundle to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}
