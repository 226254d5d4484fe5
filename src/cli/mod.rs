//! Command-line parsing for the Brent log-return dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/filter/projection code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "brent", version, about = "Brent oil log returns and change-point dashboard")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Backend base URL (overrides BRENT_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (overrides BRENT_API_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(TuiArgs),
    /// Print the visible log-return series (optionally plot/export it).
    Series(SeriesArgs),
    /// Print the change-point summary.
    ChangePoint,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Initial date filter (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Log file (the terminal is taken over by the UI).
    #[arg(long, value_name = "PATH", default_value = "brent-dash.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Only show records on this day (YYYY-MM-DD). Omit for the clean series.
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Render an ASCII plot below the table.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the visible series (`.json` for JSON, otherwise CSV).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}
