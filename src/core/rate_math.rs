//! Numeric helpers shared by every pricing layer.

use crate::core::component::StrikeType;
use chrono::NaiveDate;

/// Trading days used to annualize daily log-return volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Resolve a strike or barrier level to an absolute exchange rate.
///
/// Percent levels are relative to `spot` (`105` means 105% of spot).
///
/// # Examples
///
/// ```
/// use fx_hedge_engine::core::component::StrikeType;
/// use fx_hedge_engine::core::rate_math::resolve_strike;
///
/// assert_eq!(resolve_strike(50.0, StrikeType::Percent, 2.0), 1.0);
/// assert_eq!(resolve_strike(1.25, StrikeType::Absolute, 1.20), 1.25);
/// ```
pub fn resolve_strike(value: f64, strike_type: StrikeType, spot: f64) -> f64 {
    match strike_type {
        StrikeType::Percent => spot * value / 100.0,
        StrikeType::Absolute => value,
    }
}

/// Calendar-month bucket key, `YYYY-MM`.
pub fn month_key(date: &NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Annualized volatility of an ordered price sequence.
///
/// Uses log returns `ln(p[i] / p[i-1])`, the sample standard deviation
/// (N-1 denominator) and scales by `sqrt(252)`. Returns `None` with fewer
/// than two prices, or when a price is not strictly positive and finite.
///
/// Exactly two prices give a single return, which has no sample dispersion:
/// the result is `Some(0.0)` however large the move. Callers that feed the
/// figure into pricing should require at least three prices.
pub fn annualized_volatility(prices: &[f64]) -> Option<f64> {
    if prices.len() < 2 {
        return None;
    }
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return None;
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    if returns.len() < 2 {
        return Some(0.0);
    }

    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Percentage rate (e.g. `4.5`) to a decimal fraction (`0.045`).
pub(crate) fn percent_to_fraction(value: f64) -> f64 {
    value / 100.0
}
