//! Static chart configuration handed to renderers alongside the series.

/// RGBA color with alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub dataset_label: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub legend: LegendPosition,
    pub line_color: Rgba,
    /// Marker radius of ordinary points (0 hides them).
    pub point_radius: u32,
    /// Marker radius of the change-point date.
    pub highlight_radius: u32,
    /// Marker radius of the point under the cursor (0 disables the cursor).
    pub hover_radius: u32,
    pub tooltip_prefix: &'static str,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            dataset_label: "Log Returns",
            x_title: "Date",
            y_title: "Log Returns",
            legend: LegendPosition::Top,
            line_color: Rgba::new(75, 192, 192, 1.0),
            point_radius: 0,
            highlight_radius: 5,
            hover_radius: 5,
            tooltip_prefix: "Log Return: ",
        }
    }
}

impl ChartOptions {
    pub fn radius_for(&self, highlighted: bool) -> u32 {
        if highlighted { self.highlight_radius } else { self.point_radius }
    }

    pub fn has_marker(&self, highlighted: bool) -> bool {
        self.radius_for(highlighted) > 0
    }

    /// Hover text for a raw value, unformatted.
    pub fn tooltip(&self, value: f64) -> String {
        format!("{}{}", self.tooltip_prefix, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_is_unformatted() {
        let opts = ChartOptions::default();
        assert_eq!(opts.tooltip(0.02), "Log Return: 0.02");
        assert_eq!(opts.tooltip(-0.001234567), "Log Return: -0.001234567");
        assert_eq!(opts.tooltip(f64::NAN), "Log Return: NaN");
    }

    #[test]
    fn only_highlight_gets_a_marker() {
        let opts = ChartOptions::default();
        assert_eq!(opts.radius_for(true), 5);
        assert_eq!(opts.radius_for(false), 0);
    }
}
