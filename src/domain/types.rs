//! Shared domain types.
//!
//! Records are immutable once fetched. Everything chart-related is derived
//! from them on demand and thrown away after each render.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// One row of the price series as delivered by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Raw datetime text, e.g. `2020-01-01 00:00:00`. Empty when the source
    /// omitted it.
    pub date: String,
    /// Log return; NaN when missing or non-numeric.
    pub log_return: f64,
    /// Closing price, when the backend ships it.
    pub price: Option<f64>,
}

impl PriceRecord {
    pub fn new(date: impl Into<String>, log_return: f64) -> Self {
        Self {
            date: date.into(),
            log_return,
            price: None,
        }
    }

    /// Date portion of the raw datetime: the text before the first space.
    ///
    /// Returns `None` unless that text is a `YYYY-MM-DD` calendar date.
    pub fn date_portion(&self) -> Option<&str> {
        let head = self.date.split(' ').next().unwrap_or("");
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok().map(|_| head)
    }

    pub fn has_log_return(&self) -> bool {
        !self.log_return.is_nan()
    }
}

/// Result of the change-point analysis.
///
/// Held as `Option<ChangePoint>`: `None` means no change point was detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePoint {
    pub change_point_date: String,
    pub associated_event: String,
    pub log_return_change: f64,
    pub event_date: String,
    pub event_description: String,
}

/// A validated `YYYY-MM-DD` filter date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDate {
    text: String,
}

impl FilterDate {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            text: day.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for FilterDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The user's date filter. Default is "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date: Option<FilterDate>,
}

impl FilterState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn on(date: FilterDate) -> Self {
        Self { date: Some(date) }
    }

    /// Interpret raw date-input text. Empty (or whitespace) clears the filter.
    pub fn from_input(raw: &str) -> Result<Self, chrono::ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::none());
        }
        FilterDate::parse(trimmed).map(Self::on)
    }

    pub fn is_active(&self) -> bool {
        self.date.is_some()
    }

    pub fn label(&self) -> &str {
        self.date.as_ref().map(FilterDate::as_str).unwrap_or("none")
    }
}

/// Chart-ready projection of the filtered records.
///
/// The three vectors always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub highlight: Vec<bool>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the first highlighted point, if any.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlight.iter().position(|&h| h)
    }

    pub fn point(&self, index: usize) -> Option<ChartPoint<'_>> {
        Some(ChartPoint {
            index,
            label: self.labels.get(index)?,
            value: *self.values.get(index)?,
            highlighted: *self.highlight.get(index)?,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = ChartPoint<'_>> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }
}

/// A borrowed view of one point in a [`ChartSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint<'a> {
    pub index: usize,
    pub label: &'a str,
    pub value: f64,
    pub highlighted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_portion_splits_on_first_space() {
        let r = PriceRecord::new("2020-01-01 00:00:00", 0.1);
        assert_eq!(r.date_portion(), Some("2020-01-01"));

        let bare = PriceRecord::new("2020-01-01", 0.1);
        assert_eq!(bare.date_portion(), Some("2020-01-01"));

        assert_eq!(PriceRecord::new("", 0.1).date_portion(), None);
        assert_eq!(PriceRecord::new(" 00:00:00", 0.1).date_portion(), None);
        assert_eq!(PriceRecord::new("n/a", 0.1).date_portion(), None);
        assert_eq!(PriceRecord::new("12345", 0.1).date_portion(), None);
        assert_eq!(PriceRecord::new("2020-02-30 00:00:00", 0.1).date_portion(), None);
        assert_eq!(PriceRecord::new("2020-01-01T00:00:00", 0.1).date_portion(), None);
    }

    #[test]
    fn filter_state_from_input() {
        assert_eq!(FilterState::from_input("").unwrap(), FilterState::none());
        assert_eq!(FilterState::from_input("   ").unwrap(), FilterState::none());

        let f = FilterState::from_input("2020-01-02").unwrap();
        assert!(f.is_active());
        assert_eq!(f.label(), "2020-01-02");

        assert!(FilterState::from_input("2020-13-40").is_err());
        assert!(FilterState::from_input("yesterday").is_err());
    }

    #[test]
    fn series_point_access() {
        let s = ChartSeries {
            labels: vec!["2020-01-01".to_string(), "2020-01-02".to_string()],
            values: vec![0.02, -0.01],
            highlight: vec![false, true],
        };
        assert_eq!(s.highlighted_index(), Some(1));
        let p = s.point(1).unwrap();
        assert_eq!(p.label, "2020-01-02");
        assert!(p.highlighted);
        assert!(s.point(2).is_none());
        assert_eq!(s.points().count(), 2);
    }
}
