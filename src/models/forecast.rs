//! Forecast model returned by the urban dynamics predictor

use serde::{Deserialize, Serialize};

/// Which path produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    /// Parsed and validated reasoning service response
    Reasoning,
    /// Deterministic baseline and pricing heuristic
    #[default]
    Heuristic,
}

/// Qualitative scores, each in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarScores {
    pub traffic: u8,
    pub competition: u8,
    pub brand: u8,
}

impl RadarScores {
    #[must_use]
    pub fn new(traffic: u8, competition: u8, brand: u8) -> Self {
        Self {
            traffic,
            competition,
            brand,
        }
    }
}

impl Default for RadarScores {
    fn default() -> Self {
        Self::new(50, 50, 50)
    }
}

/// Strength and risk summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Swot {
    pub strength: String,
    pub risk: String,
}

/// Traffic and revenue forecast for a single site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Pedestrians per hour
    pub predicted_traffic: u32,
    /// Monthly revenue in currency units, never zero
    pub est_monthly_revenue: u64,
    pub payback_months: f64,
    pub radar_scores: RadarScores,
    pub swot: Swot,
    pub reasoning: String,
    #[serde(default)]
    pub source: ForecastSource,
}

impl Forecast {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == ForecastSource::Heuristic
    }

    /// Revenue formatted with thousands separators, e.g. `¥264,000`
    #[must_use]
    pub fn format_revenue(&self) -> String {
        let digits = self.est_monthly_revenue.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("¥{grouped}")
    }

    /// Payback period with one decimal, e.g. `6.8 months`
    #[must_use]
    pub fn format_payback(&self) -> String {
        format!("{:.1} months", self.payback_months)
    }
}
