//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics and rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::sample::MAX_DEMO_MONTHS;
use crate::domain::{CostView, TimeRange};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Business analytics dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default).
    Tui(TuiArgs),
    /// Check backend connectivity.
    Status(ConnArgs),
    /// Print monthly sales, returns and return rate.
    Sales(SalesArgs),
    /// Print the cost breakdown tables.
    Costs(CostsArgs),
    /// Print the overview statistic cards.
    Overview,
    /// Ask the language model a question about the product data.
    Ask(AskArgs),
    /// Ask the backend to reload its data.
    Refresh(ConnArgs),
    /// List product categories known to the backend.
    Categories(ConnArgs),
}

/// Where to reach the backend.
#[derive(Debug, Args, Clone, Default)]
pub struct ConnArgs {
    /// Backend origin (overrides DASH_API_BASE).
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Request timeout in seconds (overrides DASH_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Where sales rows come from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Use generated sales data instead of the backend.
    #[arg(long)]
    pub demo: bool,

    /// Seed for generated sales data.
    #[arg(long, default_value_t = 42, requires = "demo")]
    pub seed: u64,

    /// Months of generated sales data, ending with the current month.
    #[arg(
        long,
        default_value_t = 12,
        requires = "demo",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DEMO_MONTHS))
    )]
    pub months: u32,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub conn: ConnArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Initial sales time range.
    #[arg(short = 'r', long, value_enum, default_value_t = TimeRange::TwelveMonths)]
    pub range: TimeRange,
}

#[derive(Debug, Args, Clone)]
pub struct SalesArgs {
    #[command(flatten)]
    pub conn: ConnArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Sales time range.
    #[arg(short = 'r', long, value_enum, default_value_t = TimeRange::TwelveMonths)]
    pub range: TimeRange,

    /// Export the monthly buckets to a .csv or .json file.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CostsArgs {
    /// Which cost table to print.
    #[arg(long, value_enum, default_value_t = CostView::Breakdown)]
    pub view: CostView,
}

#[derive(Debug, Args, Clone)]
pub struct AskArgs {
    #[command(flatten)]
    pub conn: ConnArgs,

    /// The question; multiple words are joined with spaces.
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,
}
