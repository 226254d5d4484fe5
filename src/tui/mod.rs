//! Ratatui-based terminal UI.
//!
//! The TUI fetches both resources once, then renders the log-return chart,
//! a date filter input and the change-point panel. Every key press re-derives
//! the chart from the dashboard state; nothing is fetched again.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBAColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use tracing::{info, warn};

use crate::app::dashboard::{Dashboard, DashboardView};
use crate::data::{ApiClient, fetch_all};
use crate::domain::{ChangePoint, ChartSeries, FilterState};
use crate::error::AppError;
use crate::series::{ChartOptions, LegendPosition};

mod plotters_chart;

use plotters_chart::{label_at, LogReturnChart};

const TITLE: &str = "Brent Oil Price Analysis Dashboard";

/// Start the TUI.
pub fn run(client: ApiClient, initial_filter: FilterState) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client.base_url().to_string(), initial_filter);
    terminal
        .draw(|f| app.draw(f))
        .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;

    app.load(&client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dashboard: Dashboard,
    base_url: String,
    loaded: bool,
    date_input: String,
    editing_date: bool,
    cursor: Option<usize>,
    status: String,
}

impl App {
    fn new(base_url: String, filter: FilterState) -> Self {
        let mut dashboard = Dashboard::new();
        dashboard.set_filter(filter);
        Self {
            dashboard,
            base_url,
            loaded: false,
            date_input: String::new(),
            editing_date: false,
            cursor: None,
            status: "Fetching data...".to_string(),
        }
    }

    fn load(&mut self, client: &ApiClient) {
        let report = self.dashboard.apply(fetch_all(client));
        self.loaded = true;
        info!(failures = report.failures.len(), "dashboard loaded");
        self.status = if report.is_clean() {
            format!("Loaded {} price records.", self.dashboard.prices().len())
        } else {
            report.summary()
        };
        self.reset_cursor();
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_date {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('/') | KeyCode::Enter => {
                self.editing_date = true;
                self.date_input = self
                    .dashboard
                    .filter()
                    .date
                    .as_ref()
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                self.status = "Editing date (YYYY-MM-DD). Enter to apply, empty to clear, Esc to cancel.".to_string();
            }
            KeyCode::Char('c') => {
                self.dashboard.set_filter(FilterState::none());
                self.reset_cursor();
                self.status = "Filter cleared.".to_string();
            }
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Home => self.jump_cursor(false),
            KeyCode::End => self.jump_cursor(true),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if (c.is_ascii_digit() || c == '-') && self.date_input.len() < 10 {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self) {
        let raw = self.date_input.trim().to_string();
        match self.dashboard.set_filter_input(&raw) {
            Ok(()) => {
                self.reset_cursor();
                let n = self.dashboard.view().series.len();
                self.status = format!("filter: {} ({n} points)", self.dashboard.filter().label());
            }
            Err(e) => {
                warn!(input = %raw, error = %e, "rejected filter date");
                self.status = format!("Invalid date '{raw}': {e}");
            }
        }
    }

    /// Park the cursor on the change point when it is visible.
    fn reset_cursor(&mut self) {
        self.cursor = self.dashboard.view().series.highlighted_index();
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.dashboard.view().series.len();
        self.cursor = step_cursor(self.cursor, delta, len);
    }

    fn jump_cursor(&mut self, to_end: bool) {
        let len = self.dashboard.view().series.len();
        self.cursor = match (len, to_end) {
            (0, _) => None,
            (n, true) => Some(n - 1),
            (_, false) => Some(0),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let view = self.dashboard.view();
        let panel_height = if view.change_point.is_some() { 7 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(panel_height),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0], &view);
        self.draw_chart(frame, chunks[1], &view);
        if let Some(cp) = view.change_point {
            draw_change_point(frame, chunks[2], cp);
        }
        self.draw_footer(frame, chunks[3], &view);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView<'_>) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled(TITLE, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", self.base_url), Style::default().fg(Color::Gray)),
        ]));

        let filter_span = if self.editing_date {
            Span::styled(
                format!("{}_", self.date_input),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else if view.filter.is_active() {
            Span::styled(view.filter.label().to_string(), Style::default().fg(Color::White))
        } else {
            Span::styled("all dates", Style::default().fg(Color::Gray))
        };

        lines.push(Line::from(vec![
            Span::raw("Filter by Date: "),
            filter_span,
            Span::styled(
                format!(" | points: {} of {}", view.series.len(), self.dashboard.prices().len()),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView<'_>) {
        let options = view.options;
        let legend = format!(" {} ", options.dataset_label);
        let block = Block::default().borders(Borders::ALL);
        let block = match options.legend {
            LegendPosition::Top => block.title_top(legend),
            LegendPosition::Bottom => block.title_bottom(legend),
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let message = if !self.loaded {
            Some("Waiting for data...".to_string())
        } else if view.series.is_empty() {
            Some(match &view.filter.date {
                Some(d) => format!("No records for {d}."),
                None => "No price data.".to_string(),
            })
        } else {
            None
        };
        if let Some(message) = message {
            let msg = Paragraph::new(message).style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let data = chart_data(&view.series, options, self.cursor);
        let (chart_rect, insets) = chart_layout(inner);
        let c = options.line_color;
        let widget = LogReturnChart {
            segments: &data.segments,
            markers: &data.markers,
            cursor: data.cursor,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            line_color: RGBAColor(c.r, c.g, c.b, c.a),
            x_label: options.x_title,
            y_label: options.y_title,
            labels: &view.series.labels,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, &data, &view.series.labels, options);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView<'_>) {
        let help = "/ filter  c clear  ←/→ move  q quit";
        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
        ];

        let hover = self
            .cursor
            .and_then(|i| Some((view.series.point(i)?, view.tooltip(i)?)));
        if let Some((point, tooltip)) = hover {
            spans.push(Span::styled(
                format!("{} {tooltip}", point.label),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow)));

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_change_point(frame: &mut ratatui::Frame<'_>, area: Rect, cp: &ChangePoint) {
    let label_style = Style::default().add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = crate::report::change_point_fields(Some(cp))
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), label_style),
                Span::raw(value),
            ])
        })
        .collect();

    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Change Point Analysis").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn step_cursor(cursor: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len as isize - 1;
    Some(match cursor {
        Some(i) => (i as isize + delta).clamp(0, last) as usize,
        None if delta < 0 => last as usize,
        None => 0,
    })
}

/// Plotters-ready geometry for one frame.
#[derive(Debug, Clone, PartialEq)]
struct ChartData {
    segments: Vec<Vec<(f64, f64)>>,
    markers: Vec<(f64, f64)>,
    cursor: Option<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart geometry: x is the point index, y the log return.
fn chart_data(series: &ChartSeries, options: &ChartOptions, cursor: Option<usize>) -> ChartData {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (i, &v) in series.values.iter().enumerate() {
        if v.is_finite() {
            current.push((i as f64, v));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let markers = series
        .points()
        .filter(|p| p.value.is_finite() && options.has_marker(p.highlighted))
        .map(|p| (p.index as f64, p.value))
        .collect();

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &v in series.values.iter().filter(|v| v.is_finite()) {
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = -1.0;
        y_max = 1.0;
    } else if y_max <= y_min {
        let half = y_min.abs().max(1e-3);
        y_min -= half;
        y_max += half;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    let x_bounds = [-0.5, series.len().max(1) as f64 - 0.5];

    let cursor = cursor
        .filter(|_| options.hover_radius > 0)
        .and_then(|i| series.values.get(i).map(|&v| (i, v)))
        .map(|(i, v)| {
            let y = if v.is_finite() { v } else { (y_bounds[0] + y_bounds[1]) / 2.0 };
            (i as f64, y)
        });

    ChartData {
        segments,
        markers,
        cursor,
        x_bounds,
        y_bounds,
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    data: &ChartData,
    labels: &[String],
    options: &ChartOptions,
) {
    let style = Style::default().fg(Color::Gray);
    let x_bounds = data.x_bounds;
    let y_bounds = data.y_bounds;

    // Dates are 10 columns wide; keep a gap between them.
    let x_ticks = ((chart.width / 14) as usize).clamp(2, 5).min(labels.len().max(1));
    for i in 0..x_ticks {
        let u = if x_ticks == 1 { 0.5 } else { i as f64 / (x_ticks as f64 - 1.0) };
        let x_val = x_bounds[0] + 0.5 + u * (x_bounds[1] - x_bounds[0] - 1.0);
        let label = label_at(labels, x_val);
        if label.is_empty() {
            continue;
        }
        let span = (x_bounds[1] - x_bounds[0]).max(1e-12);
        let frac = (x_val - x_bounds[0]) / span;
        let x = chart.x + ((chart.width - 1) as f64 * frac).round() as u16;
        let label_len = label.len() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .max(inner.x)
            .min((inner.x + inner.width).saturating_sub(label_len));
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let y_ticks = 5usize;
    for i in 0..y_ticks {
        let u = i as f64 / (y_ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{:.3}", y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(options.x_title)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(options.y_title)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(insets.left + chart.width),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>, highlight: Vec<bool>) -> ChartSeries {
        let labels = (1..=values.len()).map(|d| format!("2020-01-{d:02}")).collect();
        ChartSeries {
            labels,
            values,
            highlight,
        }
    }

    #[test]
    fn nan_splits_segments() {
        let s = series(vec![0.1, 0.2, f64::NAN, 0.3], vec![false, false, false, true]);
        let data = chart_data(&s, &ChartOptions::default(), None);
        assert_eq!(data.segments, vec![vec![(0.0, 0.1), (1.0, 0.2)], vec![(3.0, 0.3)]]);
        assert_eq!(data.markers, vec![(3.0, 0.3)]);
        assert_eq!(data.x_bounds, [-0.5, 3.5]);
        assert!(data.y_bounds[0] < 0.1 && data.y_bounds[1] > 0.3);
        assert!(data.cursor.is_none());
    }

    #[test]
    fn all_nan_uses_fallback_bounds_and_centered_cursor() {
        let s = series(vec![f64::NAN], vec![false]);
        let data = chart_data(&s, &ChartOptions::default(), Some(0));
        assert!(data.segments.is_empty());
        assert!(data.markers.is_empty());
        assert_eq!(data.cursor, Some((0.0, 0.0)));
        assert_eq!(data.x_bounds, [-0.5, 0.5]);
    }

    #[test]
    fn cursor_hidden_without_hover_radius() {
        let s = series(vec![0.1], vec![false]);
        let opts = ChartOptions {
            hover_radius: 0,
            ..ChartOptions::default()
        };
        assert!(chart_data(&s, &opts, Some(0)).cursor.is_none());
    }

    #[test]
    fn cursor_steps_and_clamps() {
        assert_eq!(step_cursor(None, 1, 0), None);
        assert_eq!(step_cursor(None, 1, 3), Some(0));
        assert_eq!(step_cursor(None, -1, 3), Some(2));
        assert_eq!(step_cursor(Some(2), 1, 3), Some(2));
        assert_eq!(step_cursor(Some(0), -1, 3), Some(0));
        assert_eq!(step_cursor(Some(1), 1, 3), Some(2));
    }

    #[test]
    fn date_edit_applies_and_rejects() {
        let mut app = App::new("http://localhost:5000".to_string(), FilterState::none());
        app.dashboard.set_prices(vec![
            crate::domain::PriceRecord::new("2020-01-01 00:00:00", 0.02),
            crate::domain::PriceRecord::new("2020-01-02 00:00:00", f64::NAN),
        ]);
        app.loaded = true;

        assert!(!app.handle_key(KeyCode::Char('/')));
        assert!(app.editing_date);
        for c in "2020-01-02".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing_date);
        assert_eq!(app.dashboard.filter().label(), "2020-01-02");
        assert_eq!(app.dashboard.view().series.len(), 1);

        app.handle_key(KeyCode::Enter);
        app.date_input = "2020-02-31".to_string();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.dashboard.filter().label(), "2020-01-02");
        assert!(app.status.starts_with("Invalid date"));

        app.handle_key(KeyCode::Char('c'));
        assert!(!app.dashboard.filter().is_active());
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
