//! Deterministic forecast used whenever the reasoning service path fails.

use crate::models::{Forecast, ForecastSource, PriceTier, RadarScores, SiteParameters, Swot};

/// Operating hours per day assumed by the revenue heuristic
pub const OPERATING_HOURS_PER_DAY: f64 = 10.0;
/// Days per month assumed by the revenue heuristic
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Share of passers-by that buy something
pub const FALLBACK_CONVERSION_RATE: f64 = 0.08;
/// Fit-out cost per square meter
pub const FIT_OUT_COST_PER_SQM: f64 = 8000.0;
/// Share of revenue that ends up as profit
pub const PROFIT_MARGIN: f64 = 0.2;

/// Marker text carried in the reasoning of every heuristic forecast
pub const FALLBACK_NOTICE: &str = "Reasoning service offline. Heuristic simulation active";

/// `floor(traffic * 10h * 30d * 0.08 * avg_check)`
#[must_use]
pub fn fallback_revenue(baseline_traffic: u32, price_tier: &PriceTier) -> u64 {
    let revenue = f64::from(baseline_traffic)
        * OPERATING_HOURS_PER_DAY
        * DAYS_PER_MONTH
        * FALLBACK_CONVERSION_RATE
        * f64::from(price_tier.average_check());
    revenue.floor() as u64
}

/// Months until fit-out cost is recovered, rounded to one decimal.
/// The `+ 1` keeps the denominator positive for zero revenue. Areas large
/// enough to overflow saturate at `f64::MAX` so the value stays a number.
#[must_use]
pub fn payback_months(area: f64, monthly_revenue: u64) -> f64 {
    let months = (area * FIT_OUT_COST_PER_SQM) / (monthly_revenue as f64 * PROFIT_MARGIN + 1.0);
    // ties round half away from zero, not half to even
    let rounded = (months * 10.0).round() / 10.0;
    if rounded.is_finite() {
        rounded.max(0.0)
    } else {
        f64::MAX
    }
}

/// Forecast built from the baseline and the pricing heuristic alone
#[must_use]
pub fn compute_fallback(baseline_traffic: u32, parameters: &SiteParameters) -> Forecast {
    let revenue = fallback_revenue(baseline_traffic, &parameters.price_tier);

    Forecast {
        predicted_traffic: baseline_traffic,
        // zero traffic would otherwise report zero revenue
        est_monthly_revenue: revenue.max(1),
        payback_months: payback_months(parameters.area, revenue),
        radar_scores: RadarScores::new(70, 40, 60),
        swot: Swot {
            strength: "Stable spatial demand".to_string(),
            risk: "Limited brand differentiation".to_string(),
        },
        reasoning: format!(
            "{FALLBACK_NOTICE}: revenue estimated from {baseline_traffic} pax/hr and {} pricing strategy.",
            parameters.price_tier
        ),
        source: ForecastSource::Heuristic,
    }
}
