//! Asset identifiers and the metadata a provider returns for them.

use crate::validate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker-like token identifying a tradable asset (e.g. `AAPL`, `PETR4.SA`, `^GSPC`).
///
/// The only local contract is non-emptiness. Whether the asset exists is
/// decided by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Trim and upper-case user input. Fails if nothing is left.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AssetId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What a successful existence probe tells us about an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub instrument_type: Option<String>,
}

impl AssetInfo {
    /// Bare info for a symbol the provider knows nothing else about.
    pub fn bare(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            long_name: None,
            currency: None,
            exchange: None,
            instrument_type: None,
        }
    }

    /// Long name when the provider has one, otherwise the symbol.
    pub fn display_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_uppercases() {
        let id = AssetId::parse("  petr4.sa \n").unwrap();
        assert_eq!(id.as_str(), "PETR4.SA");
        assert_eq!(id.to_string(), "PETR4.SA");
    }

    #[test]
    fn parse_keeps_index_caret() {
        assert_eq!(AssetId::parse("^gspc").unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn blank_identifier_is_rejected() {
        assert_eq!(AssetId::parse("   "), Err(ValidationError::EmptyIdentifier));
        assert_eq!("".parse::<AssetId>(), Err(ValidationError::EmptyIdentifier));
    }

    #[test]
    fn display_name_prefers_long_name() {
        let mut info = AssetInfo::bare("AAPL");
        assert_eq!(info.display_name(), "AAPL");
        info.long_name = Some("Apple Inc.".into());
        assert_eq!(info.display_name(), "Apple Inc.");
    }
}
