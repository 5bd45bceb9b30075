//! Forecast interpretation: how much the forecast moves, how dispersed it
//! is, and where the model's trend ends up.

use super::{first_non_finite, stats, AnalysisError, InterpretOptions, Language, SeriesKind};
use crate::domain::ForecastSeries;
use serde::Serialize;

/// Bucket of the trend component at the last forecast date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendOutlook {
    StronglyRising,
    Rising,
    Flat,
    Falling,
    StronglyFalling,
}

impl TrendOutlook {
    /// `> 0.5` strongly rising, `(0, 0.5]` rising, `< -0.5` strongly falling,
    /// `[-0.5, 0)` falling, `0` flat.
    pub fn classify(trend_value: f64) -> Self {
        if trend_value > 0.5 {
            TrendOutlook::StronglyRising
        } else if trend_value > 0.0 {
            TrendOutlook::Rising
        } else if trend_value < -0.5 {
            TrendOutlook::StronglyFalling
        } else if trend_value < 0.0 {
            TrendOutlook::Falling
        } else {
            TrendOutlook::Flat
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, TrendOutlook::StronglyRising) => "strongly rising",
            (Language::English, TrendOutlook::Rising) => "rising",
            (Language::English, TrendOutlook::Flat) => "essentially flat",
            (Language::English, TrendOutlook::Falling) => "falling",
            (Language::English, TrendOutlook::StronglyFalling) => "strongly falling",
            (Language::Portuguese, TrendOutlook::StronglyRising) => "fortemente crescente",
            (Language::Portuguese, TrendOutlook::Rising) => "crescente",
            (Language::Portuguese, TrendOutlook::Flat) => "praticamente estável",
            (Language::Portuguese, TrendOutlook::Falling) => "decrescente",
            (Language::Portuguese, TrendOutlook::StronglyFalling) => "fortemente decrescente",
        }
    }
}

/// Bucket of the absolute first-to-last forecast change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeMagnitude {
    Significant,
    Moderate,
    Small,
}

impl ChangeMagnitude {
    /// On `|change_pct|`: `> 10` significant, `(5, 10]` moderate, `<= 5` small.
    pub fn classify(change_pct: f64) -> Self {
        let magnitude = change_pct.abs();
        if magnitude > 10.0 {
            ChangeMagnitude::Significant
        } else if magnitude > 5.0 {
            ChangeMagnitude::Moderate
        } else {
            ChangeMagnitude::Small
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, ChangeMagnitude::Significant) => "significant variation",
            (Language::English, ChangeMagnitude::Moderate) => "moderate variation",
            (Language::English, ChangeMagnitude::Small) => "small variation",
            (Language::Portuguese, ChangeMagnitude::Significant) => "variação significativa",
            (Language::Portuguese, ChangeMagnitude::Moderate) => "variação moderada",
            (Language::Portuguese, ChangeMagnitude::Small) => "variação pequena",
        }
    }
}

/// Bucket of the forecast column's standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolatilityLevel {
    High,
    Moderate,
    Low,
}

impl VolatilityLevel {
    /// `> 5` high, `(2, 5]` moderate, `<= 2` low.
    pub fn classify(volatility: f64) -> Self {
        if volatility > 5.0 {
            VolatilityLevel::High
        } else if volatility > 2.0 {
            VolatilityLevel::Moderate
        } else {
            VolatilityLevel::Low
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (language, self) {
            (Language::English, VolatilityLevel::High) => "high volatility",
            (Language::English, VolatilityLevel::Moderate) => "moderate volatility",
            (Language::English, VolatilityLevel::Low) => "low volatility",
            (Language::Portuguese, VolatilityLevel::High) => "alta volatilidade",
            (Language::Portuguese, VolatilityLevel::Moderate) => "moderada volatilidade",
            (Language::Portuguese, VolatilityLevel::Low) => "baixa volatilidade",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastStats {
    pub first_forecast: f64,
    pub last_forecast: f64,
    /// First-to-last change of the forecast column, in percent.
    pub change_pct: f64,
    /// Sample standard deviation of the whole forecast column (price units).
    pub volatility: f64,
    /// Trend component at the last forecast date.
    pub trend_value: f64,
    pub trend: TrendOutlook,
    pub magnitude: ChangeMagnitude,
    pub volatility_level: VolatilityLevel,
}

impl ForecastStats {
    pub fn compute(series: &ForecastSeries) -> Result<Self, AnalysisError> {
        let values: Vec<f64> = series.values().collect();
        let (Some(&first_forecast), Some(&last_forecast), Some(last)) =
            (values.first(), values.last(), series.last())
        else {
            return Err(AnalysisError::EmptySeries {
                series: SeriesKind::Forecast,
            });
        };

        let malformed = |column, index| AnalysisError::MalformedSeries {
            series: SeriesKind::Forecast,
            column,
            index,
        };
        if let Some(index) = first_non_finite(&values) {
            return Err(malformed("forecast", index));
        }
        if first_forecast == 0.0 {
            return Err(malformed("forecast", 0));
        }
        let trend_value = last.trend;
        if !trend_value.is_finite() {
            return Err(malformed("trend", series.len() - 1));
        }

        let change_pct = (last_forecast - first_forecast) / first_forecast * 100.0;
        let volatility = stats::sample_std_dev(&values);

        Ok(Self {
            first_forecast,
            last_forecast,
            change_pct,
            volatility,
            trend_value,
            trend: TrendOutlook::classify(trend_value),
            magnitude: ChangeMagnitude::classify(change_pct),
            volatility_level: VolatilityLevel::classify(volatility),
        })
    }

    pub fn render(&self, options: &InterpretOptions) -> String {
        let language = options.language;
        let magnitude = self.magnitude.label(language);
        let level = self.volatility_level.label(language);
        let mut text = match language {
            Language::English => format!(
                "The model forecasts a {magnitude} in the asset price, with a percentage change of {:.2}%. \
                 Forecast volatility is {:.2}, which means {level} for the asset price.",
                self.change_pct, self.volatility,
            ),
            Language::Portuguese => format!(
                "O modelo prevê uma {magnitude} no preço do ativo, com uma variação percentual de {:.2}%. \
                 Nos mostrando uma volatilidade de {:.2}, ou seja, uma {level} para o preço do ativo.",
                self.change_pct, self.volatility,
            ),
        };

        if options.describe_trend {
            let trend = self.trend.label(language);
            match language {
                Language::English => text.push_str(&format!(" The long-run trend is {trend}.")),
                Language::Portuguese => text.push_str(&format!(" A tendência de longo prazo é {trend}.")),
            }
        }
        text
    }
}

/// Compute and render the forecast commentary.
pub fn interpret_forecast(series: &ForecastSeries, options: &InterpretOptions) -> Result<String, AnalysisError> {
    Ok(ForecastStats::compute(series)?.render(options))
}
