//! Text formatting for terminal output.
//!
//! Kept in one place so the TUI panel and the CLI print the same fields.

use crate::app::dashboard::DashboardView;
use crate::domain::ChangePoint;

pub const NO_CHANGE_POINT: &str = "No change point detected.";

/// Labeled change-point fields, verbatim. Empty when there is no change point.
pub fn change_point_fields(cp: Option<&ChangePoint>) -> Vec<(&'static str, String)> {
    let Some(cp) = cp else {
        return Vec::new();
    };
    vec![
        ("Date", cp.change_point_date.clone()),
        ("Event", cp.associated_event.clone()),
        ("Log Return Change", cp.log_return_change.to_string()),
        ("Event Date", cp.event_date.clone()),
        ("Description", cp.event_description.clone()),
    ]
}

/// Change-point panel as plain text.
pub fn format_change_point(cp: Option<&ChangePoint>) -> String {
    let fields = change_point_fields(cp);
    if fields.is_empty() {
        return NO_CHANGE_POINT.to_string();
    }

    let mut out = String::new();
    out.push_str("=== Change Point Analysis ===\n");
    for (label, value) in fields {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out
}

/// Filtered series as a table (one row per visible record).
pub fn format_series_table(view: &DashboardView<'_>) -> String {
    let mut out = String::new();

    out.push_str("=== Brent Oil Price Analysis ===\n");
    out.push_str(&format!("Filter: {}\n", view.filter.label()));
    out.push_str(&format!("Points: {}\n", view.series.len()));

    if view.series.is_empty() {
        out.push_str("(no matching records)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:>10} {:>14}  {}\n",
        "date", "price", "log_return", "mark"
    ));
    for (record, point) in view.visible.iter().zip(view.series.points()) {
        let price = record
            .price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let mark = if point.highlighted { "change point" } else { "" };
        out.push_str(&format!(
            "{:<12} {:>10} {:>14}  {}\n",
            point.label,
            price,
            point.value.to_string(),
            mark
        ));
    }

    out
}
