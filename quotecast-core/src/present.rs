//! Presentation seam: what a chart renderer is asked to draw.

use crate::domain::{AssetId, ForecastSeries, PriceSeries};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to plot for '{title}'")]
    NoData { title: String },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// A titled date/value line with a text annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<(NaiveDate, f64)>,
    pub annotation: String,
}

impl LineChart {
    /// Closing prices of the history.
    pub fn history(asset: &AssetId, series: &PriceSeries, annotation: &str) -> Self {
        Self {
            title: format!("Price history of {asset}"),
            x_title: "Date".into(),
            y_title: "Asset value".into(),
            points: series.points().iter().map(|p| (p.date, p.close)).collect(),
            annotation: annotation.to_string(),
        }
    }

    /// Forecast column over history and horizon.
    pub fn forecast(asset: &AssetId, series: &ForecastSeries, annotation: &str) -> Self {
        Self {
            title: format!("Price forecast of {asset}"),
            x_title: "Date".into(),
            y_title: "Asset value".into(),
            points: series.points().iter().map(|p| (p.date, p.forecast)).collect(),
            annotation: annotation.to_string(),
        }
    }

    /// Points with a finite value; missing observations are not drawn.
    pub fn finite_points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().copied().filter(|(_, v)| v.is_finite())
    }
}

pub trait ChartPresenter {
    fn render_line_chart(&mut self, chart: &LineChart) -> Result<(), RenderError>;
}

/// Draws nothing. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl ChartPresenter for NullPresenter {
    fn render_line_chart(&mut self, _chart: &LineChart) -> Result<(), RenderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;

    #[test]
    fn history_chart_plots_closes() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = PriceSeries::new(vec![PricePoint {
            date,
            close: 10.0,
            adj_close: 9.5,
            volume: 1,
        }])
        .unwrap();
        let asset = AssetId::parse("vale3.sa").unwrap();
        let chart = LineChart::history(&asset, &series, "note");
        assert_eq!(chart.title, "Price history of VALE3.SA");
        assert_eq!(chart.points, vec![(date, 10.0)]);
        assert_eq!(chart.annotation, "note");
    }

    #[test]
    fn nan_points_are_skipped() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let chart = LineChart {
            title: "t".into(),
            x_title: "x".into(),
            y_title: "y".into(),
            points: vec![(d(1), 1.0), (d(2), f64::NAN), (d(3), 3.0)],
            annotation: String::new(),
        };
        assert_eq!(chart.finite_points().count(), 2);
    }
}
