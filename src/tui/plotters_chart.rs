//! Plotters-powered log-return chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description. All series and bounds are computed
/// outside the render call.
pub struct LogReturnChart<'a> {
    /// Contiguous runs of finite points; a non-finite value starts a new run.
    pub segments: &'a [Vec<(f64, f64)>],
    /// Points drawn with a marker (change-point date).
    pub markers: &'a [(f64, f64)],
    /// Point under the cursor, if any.
    pub cursor: Option<(f64, f64)>,
    /// X bounds (point index).
    pub x_bounds: [f64; 2],
    /// Y bounds (log return).
    pub y_bounds: [f64; 2],
    pub line_color: RGBAColor,
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Point labels, indexed by x.
    pub labels: &'a [String],
}

impl<'a> Widget for LogReturnChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let labels = self.labels;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| label_at(labels, *v))
                .y_label_formatter(&|v| format!("{v:.3}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for segment in self.segments {
                if segment.len() == 1 {
                    chart.draw_series(segment.iter().map(|&(x, y)| Pixel::new((x, y), self.line_color)))?;
                } else {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &self.line_color))?;
                }
            }

            // `Circle` radii are mapped incorrectly by the ratatui backend, so
            // markers are single colored pixels.
            let marker_color = RGBColor(255, 0, 0);
            chart.draw_series(self.markers.iter().map(|&(x, y)| Pixel::new((x, y), marker_color)))?;

            if let Some((x, y)) = self.cursor {
                let cursor_color = RGBColor(255, 255, 0);
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![(x, y0), (x, y1)],
                    cursor_color,
                )))?;
                chart.draw_series(std::iter::once(Pixel::new((x, y), cursor_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label of the point nearest to x, or empty when out of range.
pub fn label_at(labels: &[String], x: f64) -> String {
    if !x.is_finite() || x < -0.5 {
        return String::new();
    }
    labels.get(x.round() as usize).cloned().unwrap_or_default()
}
