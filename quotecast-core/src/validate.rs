//! Input validation: date ranges typed by the user and asset existence checks.

use crate::data::provider::{DataError, DataProvider};
use crate::domain::{AssetId, AssetInfo, DateRange};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

/// The only accepted textual date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid date format '{input}': use YYYY-MM-DD")]
    InvalidFormat { input: String },

    #[error("start date {start} must not be after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("asset identifier is empty")]
    EmptyIdentifier,
}

/// Parse a single `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        input: trimmed.to_string(),
    })
}

/// Parse both dates and check `start <= end`. The start text is checked first.
pub fn validate_date_range(start_text: &str, end_text: &str) -> Result<DateRange, ValidationError> {
    let start = parse_date(start_text)?;
    let end = parse_date(end_text)?;
    DateRange::new(start, end)
}

/// Outcome of asking the provider whether an identifier names a real asset.
#[derive(Debug)]
pub enum Resolution {
    Resolved(AssetInfo),
    /// The provider answered and does not know the identifier.
    Unresolvable,
    /// The provider could not answer (network, rate limit, format change…).
    ProviderError(DataError),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

pub fn resolve_identifier(provider: &dyn DataProvider, asset: &AssetId) -> Resolution {
    match provider.probe(asset) {
        Ok(info) => Resolution::Resolved(info),
        Err(e) if e.is_symbol_not_found() => Resolution::Unresolvable,
        Err(e) => Resolution::ProviderError(e),
    }
}

/// Best-effort existence check. Never fails: provider errors count as "not
/// resolvable" and are logged.
pub fn is_identifier_resolvable(provider: &dyn DataProvider, asset: &AssetId) -> bool {
    match resolve_identifier(provider, asset) {
        Resolution::Resolved(_) => true,
        Resolution::Unresolvable => {
            debug!(%asset, provider = provider.name(), "identifier not known to provider");
            false
        }
        Resolution::ProviderError(e) => {
            warn!(%asset, provider = provider.name(), error = %e, "error checking identifier");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSeries;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn valid_range_keeps_exact_dates() {
        let range = validate_date_range("2023-01-02", "2024-06-30").unwrap();
        assert_eq!(range.start(), d(2023, 1, 2));
        assert_eq!(range.end(), d(2024, 6, 30));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let range = validate_date_range(" 2024-01-01\n", "2024-01-31 ").unwrap();
        assert_eq!(range.num_days(), 31);
    }

    #[test]
    fn slash_separated_date_is_invalid_format() {
        let err = validate_date_range("2024/01/01", "2024-02-01").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFormat {
                input: "2024/01/01".into()
            }
        );
    }

    #[test]
    fn bad_end_date_is_invalid_format() {
        let err = validate_date_range("2024-01-01", "2024-02-30").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { input } if input == "2024-02-30"));
    }

    #[test]
    fn format_is_checked_before_order() {
        let err = validate_date_range("not a date", "2000-01-01").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn start_after_end_is_invalid_range() {
        let err = validate_date_range("2024-05-02", "2024-05-01").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRange {
                start: d(2024, 5, 2),
                end: d(2024, 5, 1)
            }
        );
    }

    /// Probe-only provider keyed on the ticker text.
    struct ProbeOnly;

    impl DataProvider for ProbeOnly {
        fn name(&self) -> &str {
            "probe_only"
        }

        fn fetch(&self, _asset: &AssetId, _range: DateRange) -> Result<PriceSeries, DataError> {
            Ok(PriceSeries::empty())
        }

        fn probe(&self, asset: &AssetId) -> Result<AssetInfo, DataError> {
            match asset.as_str() {
                "AAPL" => Ok(AssetInfo::bare("AAPL")),
                "DOWN" => Err(DataError::NetworkUnreachable("connection refused".into())),
                other => Err(DataError::SymbolNotFound {
                    symbol: other.to_string(),
                }),
            }
        }
    }

    #[test]
    fn resolution_distinguishes_failure_causes() {
        let known = AssetId::parse("aapl").unwrap();
        let unknown = AssetId::parse("zzzz").unwrap();
        let offline = AssetId::parse("down").unwrap();

        assert!(resolve_identifier(&ProbeOnly, &known).is_resolved());
        assert!(matches!(
            resolve_identifier(&ProbeOnly, &unknown),
            Resolution::Unresolvable
        ));
        assert!(matches!(
            resolve_identifier(&ProbeOnly, &offline),
            Resolution::ProviderError(DataError::NetworkUnreachable(_))
        ));
    }

    #[test]
    fn resolvable_check_never_fails() {
        assert!(is_identifier_resolvable(&ProbeOnly, &AssetId::parse("AAPL").unwrap()));
        assert!(!is_identifier_resolvable(&ProbeOnly, &AssetId::parse("ZZZZ").unwrap()));
        assert!(!is_identifier_resolvable(&ProbeOnly, &AssetId::parse("DOWN").unwrap()));
    }
}
