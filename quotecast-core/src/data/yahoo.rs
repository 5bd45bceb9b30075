//! Yahoo Finance data provider.
//!
//! Fetches daily bars and asset metadata from Yahoo's v8 chart API. Each call
//! is a single blocking request: failures are reported, never retried. The
//! circuit breaker refuses requests after a ban or a run of server or
//! rate-limit failures.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes, which surface as `DataError::ResponseFormatChanged`.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider};
use crate::domain::{AssetId, AssetInfo, DateRange, PricePoint, PriceSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    currency: Option<String>,
    exchange_name: Option<String>,
    instrument_type: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    /// Exchange offset from UTC in seconds; bar timestamps are shifted by it
    /// before taking the calendar date.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    base_url: String,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different host (mirror or proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Chart API URL for daily bars over an inclusive date range.
    fn history_url(&self, asset: &AssetId, range: DateRange) -> String {
        let start_ts = range.start().and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = range.end().and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{}/v8/finance/chart/{}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(asset.as_str()),
        )
    }

    /// Chart API URL used for existence probes; only `meta` is read.
    fn probe_url(&self, asset: &AssetId) -> String {
        format!(
            "{}/v8/finance/chart/{}?range=5d&interval=1d",
            self.base_url,
            urlencoding::encode(asset.as_str()),
        )
    }

    /// One request, with status handling and circuit breaker bookkeeping.
    fn get_chart(&self, symbol: &str, url: &str) -> Result<ChartResponse, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        debug!(symbol, url, "requesting yahoo chart");
        // Transport errors do not count toward the breaker.
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            self.circuit_breaker.trip();
            return Err(DataError::CircuitBreakerTripped);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.circuit_breaker.record_failure();
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataError::AuthenticationRequired(
                "Yahoo Finance requires authentication".into(),
            ));
        }

        // Unknown symbols come back as 404 with a chart error body.
        if status == reqwest::StatusCode::NOT_FOUND {
            self.circuit_breaker.record_success();
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        if status.is_server_error() {
            self.circuit_breaker.record_failure();
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let chart = parse_chart(symbol, &body)?;
        self.circuit_breaker.record_success();
        Ok(chart)
    }
}

fn parse_chart(symbol: &str, body: &str) -> Result<ChartResponse, DataError> {
    serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })
}

/// First chart result, or the error Yahoo reported instead.
fn first_result(symbol: &str, resp: ChartResponse) -> Result<ChartData, DataError> {
    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))
}

/// Parse a chart response into a price series.
///
/// Rows where every value is null (holidays) are skipped; partially null rows
/// keep NaN so the analysis can point at them. When two timestamps fall on the
/// same exchange date (Yahoo appends a live bar during trading hours) the later
/// one wins. Rows whose exchange date falls outside `range` are dropped: the
/// request bounds are UTC midnights, so far-east exchanges and live bars can
/// spill a day past either end.
fn parse_history(
    symbol: &str,
    range: DateRange,
    resp: ChartResponse,
) -> Result<PriceSeries, DataError> {
    let data = first_result(symbol, resp)?;

    let Some(timestamps) = data.timestamp else {
        // Yahoo omits timestamps when the range holds no trading days.
        return Ok(PriceSeries::empty());
    };

    let indicators = data
        .indicators
        .ok_or_else(|| DataError::ResponseFormatChanged("no indicators".into()))?;
    let quote = indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;
    let adj_closes = indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);
    let offset = data.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = exchange_date(ts, offset)?;
        if !range.contains(date) {
            continue;
        }
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();
        let adj_close = match &adj_closes {
            Some(values) => values.get(i).copied().flatten(),
            None => close,
        };

        if close.is_none() && adj_close.is_none() && volume.is_none() {
            continue;
        }

        let point = PricePoint {
            date,
            close: close.unwrap_or(f64::NAN),
            adj_close: adj_close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        };

        match points.last_mut() {
            Some(last) if last.date == date => *last = point,
            _ => points.push(point),
        }
    }

    Ok(PriceSeries::new(points)?)
}

fn parse_info(symbol: &str, resp: ChartResponse) -> Result<AssetInfo, DataError> {
    let meta = first_result(symbol, resp)?
        .meta
        .ok_or_else(|| DataError::ResponseFormatChanged("no meta block".into()))?;

    Ok(AssetInfo {
        symbol: meta.symbol,
        long_name: meta.long_name.or(meta.short_name),
        currency: meta.currency,
        exchange: meta.exchange_name,
        instrument_type: meta.instrument_type,
    })
}

fn exchange_date(ts: i64, gmt_offset: i64) -> Result<NaiveDate, DataError> {
    DateTime::from_timestamp(ts + gmt_offset, 0)
        .map(|dt| dt.naive_utc().date())
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, asset: &AssetId, range: DateRange) -> Result<PriceSeries, DataError> {
        let url = self.history_url(asset, range);
        let chart = self.get_chart(asset.as_str(), &url)?;
        let series = parse_history(asset.as_str(), range, chart)?;
        debug!(%asset, rows = series.len(), "history fetched");
        Ok(series)
    }

    fn probe(&self, asset: &AssetId) -> Result<AssetInfo, DataError> {
        let url = self.probe_url(asset);
        let chart = self.get_chart(asset.as_str(), &url)?;
        parse_info(asset.as_str(), chart)
    }
}
