//! Input/output helpers.
//!
//! - series exports (CSV/JSON) (`export`)

pub mod export;

pub use export::*;
