//! `brent-dash` library crate.
//!
//! The binary (`brent`) is a thin wrapper around this library so that:
//!
//! - the fetch/filter/projection pipeline is testable without spawning processes
//! - the CLI and the TUI share one presenter (`app::dashboard`)

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod series;
pub mod tui;
