//! Synthetic rate series for demos, benchmarks and stress testing.
//!
//! Rates follow a geometric Brownian motion sampled on weekdays.

use crate::core::rate_math::TRADING_DAYS_PER_YEAR;
use crate::history::series::{HistoricalDataPoint, HistoricalSeries};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Configuration for generating a synthetic rate series.
#[derive(Debug, Clone)]
pub struct MarketSeriesConfig {
    pub start_date: NaiveDate,
    /// Number of weekday observations.
    pub observations: usize,
    pub initial_rate: f64,
    /// Annualized drift, decimal.
    pub drift: f64,
    /// Annualized volatility, decimal.
    pub volatility: f64,
    /// Fixed seed for reproducible series.
    pub seed: Option<u64>,
}

impl Default for MarketSeriesConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default(),
            observations: 252,
            initial_rate: 1.10,
            drift: 0.0,
            volatility: 0.08,
            seed: None,
        }
    }
}

/// Generate a weekday GBM rate series.
pub fn generate_rate_series(config: &MarketSeriesConfig) -> HistoricalSeries {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let dt = 1.0 / TRADING_DAYS_PER_YEAR;
    let drift_step = (config.drift - 0.5 * config.volatility * config.volatility) * dt;
    let vol_step = config.volatility * dt.sqrt();

    let mut date = next_weekday(config.start_date);
    let mut rate = config.initial_rate;
    let mut points = Vec::with_capacity(config.observations);

    for i in 0..config.observations {
        if i > 0 {
            let z: f64 = StandardNormal.sample(&mut rng);
            rate *= (drift_step + vol_step * z).exp();
            date = next_weekday(date + Duration::days(1));
        }
        points.push(HistoricalDataPoint::new(date, rate));
    }

    HistoricalSeries::from_points(points)
}

fn next_weekday(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_length_and_start() {
        let config = MarketSeriesConfig {
            observations: 30,
            seed: Some(7),
            ..Default::default()
        };
        let series = generate_rate_series(&config);
        assert_eq!(series.len(), 30);
        assert_eq!(series.points()[0].price, 1.10);
        assert!(series
            .points()
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn test_seeded_series_is_reproducible() {
        let config = MarketSeriesConfig {
            observations: 50,
            seed: Some(42),
            ..Default::default()
        };
        assert_eq!(generate_rate_series(&config), generate_rate_series(&config));
    }

    #[test]
    fn test_zero_volatility_without_drift_is_flat() {
        let config = MarketSeriesConfig {
            observations: 10,
            volatility: 0.0,
            seed: Some(1),
            ..Default::default()
        };
        let series = generate_rate_series(&config);
        assert!(series.prices().iter().all(|p| *p == 1.10));
    }

    #[test]
    fn test_weekend_start_rolls_forward() {
        let config = MarketSeriesConfig {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(), // Saturday
            observations: 1,
            seed: Some(3),
            ..Default::default()
        };
        let series = generate_rate_series(&config);
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2023, 1, 9).unwrap());
    }
}
