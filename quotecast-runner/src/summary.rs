//! End-of-session summary: one line per analysed asset.

use std::fmt;

use serde::Serialize;

use quotecast_core::domain::{AnalysisRecord, AssetId, DateRange};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub asset: AssetId,
    pub name: String,
    pub range: DateRange,
    pub observations: usize,
    pub forecast_rows: usize,
    pub last_close: Option<f64>,
    pub final_forecast: Option<f64>,
}

impl SummaryLine {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        Self {
            asset: record.asset.clone(),
            name: record.display_name().to_string(),
            range: record.range,
            observations: record.history.len(),
            forecast_rows: record.forecast.len(),
            last_close: record.last_close(),
            final_forecast: record.final_forecast(),
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) | {} | {} observations, {} forecast rows",
            self.asset, self.name, self.range, self.observations, self.forecast_rows
        )?;
        if let Some(close) = self.last_close {
            write!(f, " | last close {close:.2}")?;
        }
        if let Some(value) = self.final_forecast {
            write!(f, " | final forecast {value:.2}")?;
        }
        Ok(())
    }
}

/// Summary of a finished session, in analysis order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub lines: Vec<SummaryLine>,
}

impl SessionSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        Self {
            lines: records.iter().map(SummaryLine::from_record).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            return f.write_str("No assets analysed.");
        }
        writeln!(f, "Analysed {} asset(s):", self.lines.len())?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
