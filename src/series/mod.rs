//! Client-side data shaping: filter predicate, chart projection, chart options.
//!
//! Everything here is pure and synchronous so it can be re-run on every
//! filter change without caching.

pub mod filter;
pub mod options;
pub mod projection;

pub use filter::filter_records;
pub use options::{ChartOptions, LegendPosition, Rgba};
pub use projection::project;
