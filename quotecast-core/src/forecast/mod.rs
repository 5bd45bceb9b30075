//! Forecast engine seam.
//!
//! The model itself lives in an external library. This module fixes the
//! contract: fit on a price series, predict over the historical dates plus a
//! horizon of consecutive calendar days, return a `ForecastSeries`.

pub mod prophet;

pub use prophet::ProphetEngine;

use crate::domain::{ForecastSeries, PriceSeries, SeriesError};
use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Calendar days forecast beyond the last observed date.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Minimum finite observations a model is fitted on.
pub const MIN_TRAINING_POINTS: usize = 2;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("not enough usable observations to fit a model: {usable} (need at least {required})")]
    InsufficientHistory { usable: usize, required: usize },

    #[error("forecast model failed: {0}")]
    Model(String),

    #[error("forecast output has {got} rows for {expected} requested dates")]
    Shape { expected: usize, got: usize },

    #[error("forecast starts on {forecast_start} but history starts on {history_start}")]
    Discontinuity {
        history_start: NaiveDate,
        forecast_start: NaiveDate,
    },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// A forecasting model library behind a fit/predict interface.
pub trait ForecastEngine {
    type Model;

    fn name(&self) -> &str;

    /// Fit a model on the adjusted closes of `history`.
    fn fit(&self, history: &PriceSeries) -> Result<Self::Model, ForecastError>;

    /// Predict `horizon_days` days past the last fitted date, optionally
    /// preceded by every historical date.
    fn predict(
        &self,
        model: &Self::Model,
        horizon_days: u32,
        include_history: bool,
    ) -> Result<ForecastSeries, ForecastError>;

    /// Fit, then predict with history included.
    fn forecast(&self, history: &PriceSeries, horizon_days: u32) -> Result<ForecastSeries, ForecastError> {
        let model = self.fit(history)?;
        self.predict(&model, horizon_days, true)
    }
}

/// Dates and finite adjusted closes a model can be trained on.
pub fn training_data(history: &PriceSeries) -> Result<(Vec<NaiveDate>, Vec<f64>), ForecastError> {
    let (dates, values): (Vec<NaiveDate>, Vec<f64>) = history
        .points()
        .iter()
        .filter(|p| p.adj_close.is_finite())
        .map(|p| (p.date, p.adj_close))
        .unzip();

    if values.len() < MIN_TRAINING_POINTS {
        return Err(ForecastError::InsufficientHistory {
            usable: values.len(),
            required: MIN_TRAINING_POINTS,
        });
    }
    Ok((dates, values))
}

/// Prediction grid: optionally the historical dates, then `horizon_days`
/// consecutive days after the last of them.
pub fn prediction_dates(history_dates: &[NaiveDate], horizon_days: u32, include_history: bool) -> Vec<NaiveDate> {
    let mut dates = if include_history {
        history_dates.to_vec()
    } else {
        Vec::with_capacity(horizon_days as usize)
    };
    if let Some(&last) = history_dates.last() {
        dates.extend((1..=u64::from(horizon_days)).filter_map(|i| last.checked_add_days(Days::new(i))));
    }
    dates
}

/// The forecast must start on the first historical date.
pub fn check_continuity(history: &PriceSeries, forecast: &ForecastSeries) -> Result<(), ForecastError> {
    match (history.first(), forecast.first()) {
        (Some(h), Some(f)) if h.date != f.date => Err(ForecastError::Discontinuity {
            history_start: h.date,
            forecast_start: f.date,
        }),
        (Some(_), None) => Err(ForecastError::Shape {
            expected: history.len(),
            got: 0,
        }),
        _ => Ok(()),
    }
}
