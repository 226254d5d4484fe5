//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging and configuration
//! - fetches the two backend resources once
//! - hands the resulting dashboard to the TUI or prints it

use clap::Parser;
use tracing::warn;

use crate::cli::{Command, GlobalArgs, SeriesArgs, TuiArgs};
use crate::config::ApiConfig;
use crate::data::ApiClient;
use crate::domain::FilterState;
use crate::error::AppError;

pub mod dashboard;

pub use dashboard::{Dashboard, DashboardView, LoadReport};

/// Entry point for the `brent` binary.
pub fn run() -> Result<(), AppError> {
    // `brent` and `brent --api-url X` behave like `brent tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(&cli.global, args),
        Command::Series(args) => handle_series(&cli.global, args),
        Command::ChangePoint => handle_change_point(&cli.global),
    }
}

pub fn api_config_from_args(global: &GlobalArgs) -> Result<ApiConfig, AppError> {
    Ok(ApiConfig::from_env()?.with_overrides(global.api_url.as_deref(), global.timeout))
}

/// Validate a `--date` argument before anything is fetched.
fn filter_from_arg(date: Option<&str>) -> Result<FilterState, AppError> {
    match date {
        Some(raw) => FilterState::from_input(raw)
            .map_err(|e| AppError::new(2, format!("Invalid date '{raw}': {e}"))),
        None => Ok(FilterState::none()),
    }
}

fn handle_tui(global: &GlobalArgs, args: TuiArgs) -> Result<(), AppError> {
    let filter = filter_from_arg(args.date.as_deref())?;
    crate::logging::init_file(&args.log_file)?;
    let client = ApiClient::new(api_config_from_args(global)?)?;
    crate::tui::run(client, filter)
}

fn handle_series(global: &GlobalArgs, args: SeriesArgs) -> Result<(), AppError> {
    let filter = filter_from_arg(args.date.as_deref())?;
    crate::logging::init_stderr();
    let client = ApiClient::new(api_config_from_args(global)?)?;
    let (mut dashboard, report) = Dashboard::load(&client);
    if !report.is_clean() {
        warn!("dashboard loaded with errors: {}", report.summary());
    }
    dashboard.set_filter(filter);

    let view = dashboard.view();
    println!("{}", crate::report::format_series_table(&view));

    if args.plot {
        println!("{}", crate::plot::render_ascii_plot(&view.series, view.options, args.width, args.height));
    }

    if view.change_point.is_some() {
        println!("{}", crate::report::format_change_point(view.change_point));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_series(path, &view)?;
    }

    Ok(())
}

fn handle_change_point(global: &GlobalArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = ApiClient::new(api_config_from_args(global)?)?;
    let (dashboard, report) = Dashboard::load(&client);
    if !report.is_clean() {
        warn!("dashboard loaded with errors: {}", report.summary());
    }

    println!("{}", crate::report::format_change_point(dashboard.change_point()));
    Ok(())
}

/// Rewrite argv so `brent` defaults to `brent tui`.
///
/// Rules:
/// - `brent`                      -> `brent tui`
/// - `brent --api-url X ...`      -> `brent tui --api-url X ...`
/// - `brent --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "series" | "change-point");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
