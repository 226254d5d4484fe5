//! Reporting utilities: change-point panel and series tables.

pub mod format;

pub use format::*;
