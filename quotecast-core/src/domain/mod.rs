//! Domain types shared by every stage of an analysis.

pub mod asset;
pub mod date_range;
pub mod record;
pub mod series;

pub use asset::{AssetId, AssetInfo};
pub use date_range::DateRange;
pub use record::AnalysisRecord;
pub use series::{ForecastPoint, ForecastSeries, PricePoint, PriceSeries, SeriesError};
