//! Which records are visible.
//!
//! Two modes:
//! - filter date set: records whose date portion equals it, NaN included
//! - no filter: records with a numeric log return (the clean series)
//!
//! Records without a parsable `YYYY-MM-DD` date portion are dropped in both
//! modes.

use crate::domain::{FilterState, PriceRecord};

/// Return the visible subsequence of `records`, preserving order.
pub fn filter_records<'a>(records: &'a [PriceRecord], filter: &FilterState) -> Vec<&'a PriceRecord> {
    match &filter.date {
        Some(date) => records
            .iter()
            .filter(|r| r.date_portion() == Some(date.as_str()))
            .collect(),
        None => records
            .iter()
            .filter(|r| r.date_portion().is_some() && r.has_log_return())
            .collect(),
    }
}
