//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over market-data sources so the pipeline
//! can be driven by Yahoo Finance in production and by fixtures in tests.

use crate::domain::{AssetId, AssetInfo, DateRange, PriceSeries, SeriesError};
use thiserror::Error;

/// Structured error types for data operations.
///
/// Displayed verbatim to the user at the session boundary.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (provider asks to wait {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("provider returned an invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// True when the provider answered and simply does not know the asset.
    pub fn is_symbol_not_found(&self) -> bool {
        matches!(self, DataError::SymbolNotFound { .. })
    }
}

/// A source of daily price history.
///
/// Calls block the current thread. Timeouts are the implementation's policy.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Daily observations for `asset` with dates inside `range` (both ends
    /// inclusive). An empty series means no trading days in the range.
    fn fetch(&self, asset: &AssetId, range: DateRange) -> Result<PriceSeries, DataError>;

    /// Existence probe. `SymbolNotFound` means the provider does not know the
    /// asset; any other error means it could not tell.
    fn probe(&self, asset: &AssetId) -> Result<AssetInfo, DataError>;
}
