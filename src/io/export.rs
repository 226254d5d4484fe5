//! Export the visible series to CSV or JSON.
//!
//! The format is chosen by file extension (`.json` → JSON, anything else → CSV).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::app::dashboard::DashboardView;
use crate::domain::ChangePoint;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    date: &'a str,
    raw_date: &'a str,
    price: Option<f64>,
    /// `None` for NaN, which JSON cannot carry.
    log_return: Option<f64>,
    change_point: bool,
}

#[derive(Debug, Serialize)]
struct ExportFile<'a> {
    filter: Option<&'a str>,
    change_point: Option<&'a ChangePoint>,
    points: Vec<ExportRow<'a>>,
}

fn rows<'a>(view: &'a DashboardView<'_>) -> Vec<ExportRow<'a>> {
    view.visible
        .iter()
        .zip(view.series.points())
        .map(|(record, point)| ExportRow {
            date: point.label,
            raw_date: &record.date,
            price: record.price,
            log_return: point.value.is_finite().then_some(point.value),
            change_point: point.highlighted,
        })
        .collect()
}

/// Write the view to `path`, picking the format from its extension.
pub fn write_series(path: &Path, view: &DashboardView<'_>) -> Result<(), AppError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        == Some(true);

    if is_json {
        write_series_json(path, view)
    } else {
        write_series_csv(path, view)
    }
}

pub fn write_series_csv(path: &Path, view: &DashboardView<'_>) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_csv(&mut file, view)
}

fn write_csv(out: &mut impl Write, view: &DashboardView<'_>) -> Result<(), AppError> {
    writeln!(out, "date,raw_date,price,log_return,change_point")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows(view) {
        writeln!(
            out,
            "{},{},{},{},{}",
            row.date,
            row.raw_date,
            row.price.map(|v| v.to_string()).unwrap_or_default(),
            row.log_return.map(|v| v.to_string()).unwrap_or_default(),
            row.change_point,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

pub fn write_series_json(path: &Path, view: &DashboardView<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let export = ExportFile {
        filter: view.filter.date.as_ref().map(|d| d.as_str()),
        change_point: view.change_point,
        points: rows(view),
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dashboard::Dashboard;
    use crate::domain::PriceRecord;

    #[test]
    fn csv_rows_follow_view() {
        let mut d = Dashboard::new();
        d.set_prices(vec![
            PriceRecord::new("2020-01-01 00:00:00", 0.02),
            PriceRecord::new("2020-01-02 00:00:00", f64::NAN),
        ]);
        d.set_filter_input("2020-01-02").unwrap();

        let mut buf = Vec::new();
        write_csv(&mut buf, &d.view()).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        assert_eq!(
            txt,
            "date,raw_date,price,log_return,change_point\n2020-01-02,2020-01-02 00:00:00,,,false\n"
        );
    }

    #[test]
    fn json_export_omits_nan() {
        let mut d = Dashboard::new();
        d.set_prices(vec![PriceRecord::new("2020-01-02 00:00:00", f64::NAN)]);
        d.set_filter_input("2020-01-02").unwrap();

        let path = std::env::temp_dir().join(format!("brent-dash-export-{}.json", std::process::id()));
        write_series(&path, &d.view()).unwrap();
        let txt = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let value: serde_json::Value = serde_json::from_str(&txt).unwrap();
        assert_eq!(value["filter"], "2020-01-02");
        assert!(value["change_point"].is_null());
        assert!(value["points"][0]["log_return"].is_null());
        assert_eq!(value["points"][0]["date"], "2020-01-02");
    }
}
