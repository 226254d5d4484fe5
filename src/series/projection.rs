//! Map filtered records (+ change point) into a [`ChartSeries`].

use crate::domain::{ChangePoint, ChartSeries, PriceRecord};

/// Build the chart series. Pure; values pass through unchanged.
pub fn project(records: &[&PriceRecord], change_point: Option<&ChangePoint>) -> ChartSeries {
    let marker = change_point.map(|cp| cp.change_point_date.as_str());

    let mut series = ChartSeries {
        labels: Vec::with_capacity(records.len()),
        values: Vec::with_capacity(records.len()),
        highlight: Vec::with_capacity(records.len()),
    };

    for r in records {
        let label = r.date_portion().unwrap_or("");
        series.highlight.push(marker == Some(label));
        series.labels.push(label.to_string());
        series.values.push(r.log_return);
    }

    series
}
