//! Prophet forecast engine backed by `augurs`.
//!
//! Fits on `(date, adj_close)` pairs with default Prophet options and the
//! bundled wasmstan optimizer, then predicts on a daily grid.

use super::{prediction_dates, training_data, ForecastEngine, ForecastError};
use crate::analysis::stats::sample_std_dev;
use crate::domain::{ForecastPoint, ForecastSeries, PriceSeries};
use augurs::prophet::wasmstan::WasmstanOptimizer;
use augurs::prophet::{PredictionData, Prophet, TrainingData};
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

/// z-score of the fallback 95% interval when the model returns no bounds.
const FALLBACK_Z: f64 = 1.96;

#[derive(Debug, Default, Clone, Copy)]
pub struct ProphetEngine;

impl ProphetEngine {
    pub fn new() -> Self {
        Self
    }
}

/// A fitted Prophet model plus the dates of the series it was fitted on.
pub struct ProphetModel {
    prophet: Prophet<WasmstanOptimizer>,
    history_dates: Vec<NaiveDate>,
    training_std: f64,
}

fn date_to_ts(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

impl ForecastEngine for ProphetEngine {
    type Model = ProphetModel;

    fn name(&self) -> &str {
        "prophet"
    }

    fn fit(&self, history: &PriceSeries) -> Result<ProphetModel, ForecastError> {
        let (dates, values) = training_data(history)?;
        let ds: Vec<i64> = dates.iter().copied().map(date_to_ts).collect();
        let training_std = sample_std_dev(&values);

        let data = TrainingData::new(ds, values).map_err(|e| ForecastError::Model(e.to_string()))?;
        let mut prophet = Prophet::new(Default::default(), WasmstanOptimizer::new());
        prophet
            .fit(data, Default::default())
            .map_err(|e| ForecastError::Model(e.to_string()))?;
        debug!(observations = dates.len(), "prophet model fitted");

        Ok(ProphetModel {
            prophet,
            history_dates: history.dates().collect(),
            training_std,
        })
    }

    fn predict(
        &self,
        model: &ProphetModel,
        horizon_days: u32,
        include_history: bool,
    ) -> Result<ForecastSeries, ForecastError> {
        let dates = prediction_dates(&model.history_dates, horizon_days, include_history);
        let ds: Vec<i64> = dates.iter().copied().map(date_to_ts).collect();

        let predictions = model
            .prophet
            .predict(Some(PredictionData::new(ds)))
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        let yhat = predictions.yhat;
        let trend = predictions.trend.point;
        let expected = dates.len();
        for got in [yhat.point.len(), trend.len()] {
            if got != expected {
                return Err(ForecastError::Shape { expected, got });
            }
        }

        let interval = FALLBACK_Z * model.training_std;
        let bounds_ok = |b: &Option<Vec<f64>>| b.as_ref().is_some_and(|v| v.len() == expected);
        let (lower, upper) = if bounds_ok(&yhat.lower) && bounds_ok(&yhat.upper) {
            (yhat.lower.unwrap_or_default(), yhat.upper.unwrap_or_default())
        } else {
            (
                yhat.point.iter().map(|v| v - interval).collect(),
                yhat.point.iter().map(|v| v + interval).collect(),
            )
        };

        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| ForecastPoint {
                date,
                trend: trend[i],
                forecast: yhat.point[i],
                forecast_lower: lower[i],
                forecast_upper: upper[i],
            })
            .collect();

        Ok(ForecastSeries::new(points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(date_to_ts(date), 1_704_067_200);
    }

    #[test]
    fn fit_rejects_too_little_history() {
        let err = ProphetEngine::new().fit(&PriceSeries::empty()).err().unwrap();
        assert!(matches!(err, ForecastError::InsufficientHistory { usable: 0, .. }));
    }
}
