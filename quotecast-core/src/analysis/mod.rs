//! Statistics & interpretation.
//!
//! Two independent pure pipelines, one over the price history and one over
//! the forecast. Each computes scalar statistics, classifies them into fixed
//! buckets and renders a fixed-template text. Same inputs, same text.

pub mod forecast;
pub mod historical;
pub mod stats;

pub use forecast::{interpret_forecast, ChangeMagnitude, ForecastStats, TrendOutlook, VolatilityLevel};
pub use historical::{interpret_history, HistoricalStats, PriceTrend};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which series an analysis error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    History,
    Forecast,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::History => f.write_str("historical"),
            SeriesKind::Forecast => f.write_str("forecast"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{series} series is empty")]
    EmptySeries { series: SeriesKind },

    /// A value is NaN/infinite, or zero where it is the base of a percentage.
    #[error("{series} series has an unusable {column} value at row {index}")]
    MalformedSeries {
        series: SeriesKind,
        column: &'static str,
        index: usize,
    },
}

/// Language of the rendered commentary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Portuguese,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language '{0}' (expected en or pt)")]
pub struct UnknownLanguage(String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "pt" | "pt-br" | "portuguese" => Ok(Language::Portuguese),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Rendering knobs shared by both interpretations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpretOptions {
    pub language: Language,
    /// Append the forecast trend bucket to the forecast text. Off by default:
    /// the established output computes the bucket but does not print it.
    pub describe_trend: bool,
}

/// Index of the first non-finite value, if any.
pub(crate) fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}
