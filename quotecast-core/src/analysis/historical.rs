//! Historical interpretation: returns, volatility and direction of the
//! observed closes.

use super::{first_non_finite, stats, AnalysisError, InterpretOptions, Language, SeriesKind};
use crate::domain::PriceSeries;
use serde::Serialize;

/// Direction of the period, comparing the last close with the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceTrend {
    Rising,
    Falling,
    Flat,
}

impl PriceTrend {
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            PriceTrend::Rising
        } else if last < first {
            PriceTrend::Falling
        } else {
            PriceTrend::Flat
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, PriceTrend::Rising) => "upward",
            (Language::English, PriceTrend::Falling) => "downward",
            (Language::English, PriceTrend::Flat) => "sideways",
            (Language::Portuguese, PriceTrend::Rising) => "alta",
            (Language::Portuguese, PriceTrend::Falling) => "baixa",
            (Language::Portuguese, PriceTrend::Flat) => "lateral",
        }
    }
}

/// Summary statistics of a price history. Returns are in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalStats {
    pub observations: usize,
    pub first_close: f64,
    pub last_close: f64,
    pub max_close: f64,
    pub min_close: f64,
    /// Mean step return; 0.0 when there is no step.
    pub mean_return: f64,
    /// Sample standard deviation of step returns; 0.0 with fewer than two.
    pub volatility: f64,
    pub trend: PriceTrend,
}

impl HistoricalStats {
    pub fn compute(series: &PriceSeries) -> Result<Self, AnalysisError> {
        let closes: Vec<f64> = series.closes().collect();
        let (Some(&first_close), Some(&last_close)) = (closes.first(), closes.last()) else {
            return Err(AnalysisError::EmptySeries {
                series: SeriesKind::History,
            });
        };

        let malformed = |index| AnalysisError::MalformedSeries {
            series: SeriesKind::History,
            column: "close",
            index,
        };
        if let Some(index) = first_non_finite(&closes) {
            return Err(malformed(index));
        }
        // Every close but the last is the base of a return.
        if let Some(index) = closes[..closes.len() - 1].iter().position(|&c| c == 0.0) {
            return Err(malformed(index));
        }

        let returns = stats::pct_change(&closes);

        Ok(Self {
            observations: closes.len(),
            first_close,
            last_close,
            max_close: stats::max(&closes),
            min_close: stats::min(&closes),
            mean_return: stats::mean(&returns),
            volatility: stats::sample_std_dev(&returns),
            trend: PriceTrend::between(first_close, last_close),
        })
    }

    pub fn render(&self, language: Language) -> String {
        let trend = self.trend.label(language);
        match language {
            Language::English => format!(
                "The asset trended {trend} over the analysed period.\n\
                 The mean return was {:.2}%.\n\
                 Volatility was {:.2}%.\n\
                 The highest price reached was {:.2} and the lowest was {:.2}.\n\
                 The closing price was {:.2}.",
                self.mean_return, self.volatility, self.max_close, self.min_close, self.last_close,
            ),
            Language::Portuguese => format!(
                "O ativo apresentou uma tendência {trend} no período analisado.\n\
                 O retorno médio foi de {:.2}%.\n\
                 A volatilidade foi de {:.2}%.\n\
                 O preço máximo atingido foi de {:.2} e o mínimo foi de {:.2}.\n\
                 O preço de fechamento foi de {:.2}.",
                self.mean_return, self.volatility, self.max_close, self.min_close, self.last_close,
            ),
        }
    }
}

/// Compute and render the historical commentary.
pub fn interpret_history(series: &PriceSeries, options: &InterpretOptions) -> Result<String, AnalysisError> {
    Ok(HistoricalStats::compute(series)?.render(options.language))
}
