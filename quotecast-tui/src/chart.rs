//! Line chart widget: annotation on top, date/value chart below, key hint
//! at the bottom.
//!
//! Dates are plotted as day offsets from the first point so that calendar
//! gaps (weekends, holidays) keep their width.

use chrono::{Days, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};

use quotecast_core::present::LineChart;

use crate::theme::Theme;

/// Plot coordinates plus axis bounds of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub origin: NaiveDate,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl PlotData {
    /// `None` when the chart has no finite point.
    pub fn from_chart(chart: &LineChart) -> Option<Self> {
        let mut finite = chart.finite_points().peekable();
        let origin = finite.peek()?.0;
        let points: Vec<(f64, f64)> = finite
            .map(|(date, value)| ((date - origin).num_days() as f64, value))
            .collect();

        let x_max = points.last().map(|&(x, _)| x).unwrap_or(0.0);
        let y_min = points.iter().map(|&(_, y)| y).fold(f64::INFINITY, f64::min);
        let y_max = points.iter().map(|&(_, y)| y).fold(f64::NEG_INFINITY, f64::max);

        // 5% padding; a flat line gets a unit band.
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };

        Some(Self {
            origin,
            points,
            x_bounds: [0.0, x_max.max(1.0)],
            y_bounds: [y_min - pad, y_max + pad],
        })
    }

    /// Calendar date of an x coordinate.
    pub fn date_at(&self, x: f64) -> NaiveDate {
        self.origin
            .checked_add_days(Days::new(x.max(0.0).round() as u64))
            .unwrap_or(self.origin)
    }

    fn x_labels(&self) -> Vec<Span<'static>> {
        let [lo, hi] = self.x_bounds;
        [lo, (lo + hi) / 2.0, hi]
            .into_iter()
            .map(|x| Span::raw(self.date_at(x).to_string()))
            .collect()
    }

    fn y_labels(&self) -> Vec<Span<'static>> {
        let [lo, hi] = self.y_bounds;
        [lo, (lo + hi) / 2.0, hi]
            .into_iter()
            .map(|y| Span::raw(format!("{y:.2}")))
            .collect()
    }
}

pub const KEY_HINT: &str = "Press any key to continue";

pub struct LineChartWidget<'a> {
    chart: &'a LineChart,
    theme: &'a Theme,
}

impl<'a> LineChartWidget<'a> {
    pub fn new(chart: &'a LineChart, theme: &'a Theme) -> Self {
        Self { chart, theme }
    }

    /// Rows the bordered annotation needs once wrapped to `area`, capped at
    /// half the height.
    fn annotation_height(&self, area: Rect) -> u16 {
        let width = usize::from(area.width.saturating_sub(2).max(1));
        let rows: usize = self
            .chart
            .annotation
            .lines()
            .map(|line| wrapped_rows(line, width))
            .sum();
        // borders
        let height = u16::try_from(rows.max(1) + 2).unwrap_or(u16::MAX);
        height.min(area.height / 2)
    }
}

/// Rows a greedy word wrap at `width` columns takes for one line. Words wider
/// than a row are split across rows.
fn wrapped_rows(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= width {
            used = needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        let spill = (len - 1) / width;
        rows += spill;
        used = len - spill * width;
    }
    rows
}

impl Widget for LineChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let [note_area, chart_area, hint_area] = Layout::vertical([
            Constraint::Length(self.annotation_height(area)),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(self.chart.annotation.as_str())
            .style(theme.text())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(theme.axis()))
            .render(note_area, buf);

        Paragraph::new(Line::from(Span::styled(KEY_HINT, theme.hint()))).render(hint_area, buf);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.chart.title), theme.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.background));

        let Some(plot) = PlotData::from_chart(self.chart) else {
            Paragraph::new(Span::styled("No data to plot.", theme.hint()))
                .block(block)
                .render(chart_area, buf);
            return;
        };

        let first = plot.points.first().map(|&(_, y)| y).unwrap_or(0.0);
        let last = plot.points.last().map(|&(_, y)| y).unwrap_or(0.0);
        let dataset = Dataset::default()
            .name(self.chart.y_title.as_str())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.line_color(first, last)))
            .data(&plot.points);

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title(Span::styled(self.chart.x_title.as_str(), theme.axis_title()))
                    .style(theme.axis())
                    .bounds(plot.x_bounds)
                    .labels(plot.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.chart.y_title.as_str(), theme.axis_title()))
                    .style(theme.axis())
                    .bounds(plot.y_bounds)
                    .labels(plot.y_labels()),
            )
            .render(chart_area, buf);
    }
}
