//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - fetched records (`PriceRecord`, `ChangePoint`)
//! - user input (`FilterDate`, `FilterState`)
//! - derived chart data (`ChartSeries`, `ChartPoint`)

pub mod types;

pub use types::*;
