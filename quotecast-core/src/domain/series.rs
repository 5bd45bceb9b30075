//! Price and forecast series: the time-indexed tables passed between stages.
//!
//! Both series guarantee strictly ascending (therefore unique) dates. Values
//! are not checked here: providers carry missing observations as NaN and the
//! analysis rejects them with a precise location.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One daily observation from the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// One row of a forecast: the model's trend component and the predicted value
/// with its uncertainty interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub trend: f64,
    pub forecast: f64,
    pub forecast_lower: f64,
    pub forecast_upper: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("series dates must be strictly ascending: {previous} is followed by {next} at index {index}")]
    Unordered {
        index: usize,
        previous: NaiveDate,
        next: NaiveDate,
    },
}

fn check_ascending<T>(items: &[T], date_of: impl Fn(&T) -> NaiveDate) -> Result<(), SeriesError> {
    for (i, pair) in items.windows(2).enumerate() {
        let (previous, next) = (date_of(&pair[0]), date_of(&pair[1]));
        if next <= previous {
            return Err(SeriesError::Unordered {
                index: i + 1,
                previous,
                next,
            });
        }
    }
    Ok(())
}

/// Historical prices ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        check_ascending(&points, |p| p.date)?;
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }
}

/// Forecast rows ordered by date. When produced with history included, the
/// first row shares the first date of the price series it was fitted on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(points: Vec<ForecastPoint>) -> Result<Self, SeriesError> {
        check_ascending(&points, |p| p.date)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.forecast)
    }
}
