//! quotecast core: domain types, input validation, market data, forecasting
//! and interpretation.
//!
//! - Domain types (asset ids, date ranges, price and forecast series, records)
//! - Input validator for user-typed dates and identifiers
//! - `DataProvider` seam with the Yahoo Finance adapter
//! - `ForecastEngine` seam with the Prophet adapter
//! - Statistics & interpretation of history and forecast
//! - `ChartPresenter` seam for the presentation layer

pub mod analysis;
pub mod data;
pub mod domain;
pub mod forecast;
pub mod present;
pub mod validate;
