//! Single-asset pipeline: fetch → interpret history → forecast → interpret
//! forecast.
//!
//! No I/O besides the provider call and no printing. The session decides what
//! the user sees; this module only produces a record or a typed error.

use thiserror::Error;
use tracing::{debug, info};

use quotecast_core::analysis::{interpret_forecast, interpret_history, AnalysisError, InterpretOptions};
use quotecast_core::data::{DataError, DataProvider};
use quotecast_core::domain::{AnalysisRecord, AssetId, AssetInfo, DateRange};
use quotecast_core::forecast::{check_continuity, ForecastEngine, ForecastError, DEFAULT_HORIZON_DAYS};

use crate::session::SessionState;

/// Per-asset failure. Never fatal to a session.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("asset '{0}' could not be found")]
    UnresolvableIdentifier(AssetId),

    #[error("could not retrieve data: {0}")]
    ProviderFailure(DataError),

    #[error("forecast failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

impl PipelineError {
    /// Stage at which the pipeline stopped.
    pub fn stage(&self) -> SessionState {
        match self {
            PipelineError::UnresolvableIdentifier(_) | PipelineError::ProviderFailure(_) => {
                SessionState::Fetching
            }
            PipelineError::Forecast(_) => SessionState::Forecasting,
            PipelineError::Analysis(_) => SessionState::Interpreting,
        }
    }

    fn from_data(asset: &AssetId, err: DataError) -> Self {
        if err.is_symbol_not_found() {
            PipelineError::UnresolvableIdentifier(asset.clone())
        } else {
            PipelineError::ProviderFailure(err)
        }
    }
}

/// One validated request: a known asset over a checked date range.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub asset: AssetId,
    pub range: DateRange,
    /// Probe metadata, if the asset was confirmed before the request.
    pub info: Option<AssetInfo>,
}

impl AnalysisRequest {
    pub fn new(asset: AssetId, range: DateRange) -> Self {
        Self {
            asset,
            range,
            info: None,
        }
    }

    pub fn with_info(mut self, info: AssetInfo) -> Self {
        self.info = Some(info);
        self
    }
}

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub interpret: InterpretOptions,
    pub horizon_days: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            interpret: InterpretOptions::default(),
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Run the full analysis for one asset.
///
/// History is interpreted before the model is fitted, so an empty fetch
/// surfaces as `EmptySeries` instead of a model error.
pub fn analyze_asset<E: ForecastEngine>(
    provider: &dyn DataProvider,
    engine: &E,
    request: AnalysisRequest,
    options: &PipelineOptions,
) -> Result<AnalysisRecord, PipelineError> {
    let AnalysisRequest { asset, range, info } = request;

    debug!(stage = %SessionState::Fetching, %asset, %range, provider = provider.name());
    let history = provider
        .fetch(&asset, range)
        .map_err(|e| PipelineError::from_data(&asset, e))?;

    debug!(stage = %SessionState::Interpreting, %asset, rows = history.len(), "history");
    let history_summary = interpret_history(&history, &options.interpret)?;

    debug!(stage = %SessionState::Forecasting, %asset, engine = engine.name(), horizon_days = options.horizon_days);
    let forecast = engine.forecast(&history, options.horizon_days)?;
    check_continuity(&history, &forecast)?;

    debug!(stage = %SessionState::Interpreting, %asset, rows = forecast.len(), "forecast");
    let forecast_summary = interpret_forecast(&forecast, &options.interpret)?;

    info!(%asset, observations = history.len(), forecast_rows = forecast.len(), "analysis complete");
    Ok(AnalysisRecord {
        asset,
        range,
        info,
        history,
        forecast,
        history_summary,
        forecast_summary,
    })
}
