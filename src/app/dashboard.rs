//! Presenter state shared by the CLI and TUI front-ends.
//!
//! The dashboard owns three independent cells (prices, change point, filter),
//! each replaced wholesale by its own setter. Chart data is re-derived from
//! them on every [`Dashboard::view`] call:
//! fetch once -> filter -> project -> render
//!
//! The CLI and the TUI only differ in how they present a [`DashboardView`].

use tracing::{error, info};

use crate::data::{DataSource, Fetched, fetch_all};
use crate::domain::{ChangePoint, ChartSeries, FilterState, PriceRecord};
use crate::error::FetchError;
use crate::series::{ChartOptions, filter_records, project};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    prices: Vec<PriceRecord>,
    change_point: Option<ChangePoint>,
    filter: FilterState,
    options: ChartOptions,
}

/// Endpoint failures recorded while loading. The dashboard still renders.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub failures: Vec<FetchError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            return "Loaded.".to_string();
        }
        let parts: Vec<String> = self.failures.iter().map(|e| e.to_string()).collect();
        parts.join("; ")
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub visible: Vec<&'a PriceRecord>,
    pub series: ChartSeries,
    pub change_point: Option<&'a ChangePoint>,
    pub filter: &'a FilterState,
    pub options: &'a ChartOptions,
}

impl DashboardView<'_> {
    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.series.values.get(index).map(|&v| self.options.tooltip(v))
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both resources once and build the initial state.
    pub fn load<S: DataSource + ?Sized>(source: &S) -> (Self, LoadReport) {
        let mut dashboard = Self::new();
        let report = dashboard.apply(fetch_all(source));
        (dashboard, report)
    }

    /// Store fetch results. A failed endpoint leaves its cell at the default.
    pub fn apply(&mut self, fetched: Fetched) -> LoadReport {
        let mut report = LoadReport::default();

        match fetched.prices {
            Ok(prices) => {
                info!(count = prices.len(), "fetched prices");
                self.set_prices(prices);
            }
            Err(err) => {
                error!(endpoint = err.endpoint(), error = %err, "error fetching prices");
                report.failures.push(err);
            }
        }

        match fetched.change_point {
            Ok(change_point) => {
                match &change_point {
                    Some(cp) => info!(date = %cp.change_point_date, "fetched change point"),
                    None => info!("no change point reported"),
                }
                self.set_change_point(change_point);
            }
            Err(err) => {
                error!(endpoint = err.endpoint(), error = %err, "error fetching change point");
                report.failures.push(err);
            }
        }

        report
    }

    pub fn set_prices(&mut self, prices: Vec<PriceRecord>) {
        self.prices = prices;
    }

    pub fn set_change_point(&mut self, change_point: Option<ChangePoint>) {
        self.change_point = change_point;
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Apply raw date-input text; empty clears the filter. On a parse error
    /// the current filter is kept.
    pub fn set_filter_input(&mut self, raw: &str) -> Result<(), chrono::ParseError> {
        let filter = FilterState::from_input(raw)?;
        info!(filter = filter.label(), "filter changed");
        self.set_filter(filter);
        Ok(())
    }

    pub fn prices(&self) -> &[PriceRecord] {
        &self.prices
    }

    pub fn change_point(&self) -> Option<&ChangePoint> {
        self.change_point.as_ref()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> DashboardView<'_> {
        let visible = filter_records(&self.prices, &self.filter);
        let series = project(&visible, self.change_point.as_ref());
        DashboardView {
            visible,
            series,
            change_point: self.change_point.as_ref(),
            filter: &self.filter,
            options: &self.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched_ok() -> Fetched {
        Fetched {
            prices: Ok(vec![
                PriceRecord::new("2020-01-01 00:00:00", 0.02),
                PriceRecord::new("2020-01-02 00:00:00", f64::NAN),
            ]),
            change_point: Ok(Some(ChangePoint {
                change_point_date: "2020-01-01".to_string(),
                associated_event: "Event".to_string(),
                log_return_change: 0.01,
                event_date: "2020-01-01".to_string(),
                event_description: "Description".to_string(),
            })),
        }
    }

    #[test]
    fn view_rederives_on_filter_change() {
        let mut d = Dashboard::new();
        assert!(d.apply(fetched_ok()).is_clean());

        let v = d.view();
        assert_eq!(v.series.labels, vec!["2020-01-01".to_string()]);
        assert_eq!(v.series.highlight, vec![true]);
        assert_eq!(v.tooltip(0).as_deref(), Some("Log Return: 0.02"));

        d.set_filter_input("2020-01-02").unwrap();
        let v = d.view();
        assert_eq!(v.visible.len(), 1);
        assert!(v.series.values[0].is_nan());
        assert_eq!(v.series.highlight, vec![false]);

        d.set_filter_input("").unwrap();
        assert_eq!(d.view().series.len(), 1);
    }

    #[test]
    fn bad_filter_input_keeps_previous_filter() {
        let mut d = Dashboard::new();
        d.set_filter_input("2020-01-02").unwrap();
        assert!(d.set_filter_input("2020-02-30").is_err());
        assert_eq!(d.filter().label(), "2020-01-02");
    }

    #[test]
    fn failed_endpoint_leaves_default() {
        let mut d = Dashboard::new();
        let report = d.apply(Fetched {
            prices: Err(FetchError::Status {
                endpoint: "/api/prices".to_string(),
                status: 500,
            }),
            ..fetched_ok()
        });
        assert_eq!(report.failures.len(), 1);
        assert!(d.prices().is_empty());
        assert!(d.change_point().is_some());
        assert!(d.view().series.is_empty());
    }
}
