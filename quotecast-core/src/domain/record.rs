//! AnalysisRecord: everything produced for one asset in one session.

use super::{AssetId, AssetInfo, DateRange, ForecastSeries, PriceSeries};
use serde::Serialize;

/// Result of analysing one asset. Owned by the session that produced it and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub asset: AssetId,
    pub range: DateRange,
    /// Probe metadata, when the provider confirmed the asset before fetching.
    pub info: Option<AssetInfo>,
    pub history: PriceSeries,
    pub forecast: ForecastSeries,
    pub history_summary: String,
    pub forecast_summary: String,
}

impl AnalysisRecord {
    /// Human-facing name: the provider's long name when known, else the ticker.
    pub fn display_name(&self) -> &str {
        self.info
            .as_ref()
            .map(AssetInfo::display_name)
            .unwrap_or_else(|| self.asset.as_str())
    }

    /// Last observed close, if the history has any rows.
    pub fn last_close(&self) -> Option<f64> {
        self.history.last().map(|p| p.close)
    }

    /// Forecast value on the final forecast date.
    pub fn final_forecast(&self) -> Option<f64> {
        self.forecast.last().map(|p| p.forecast)
    }
}
