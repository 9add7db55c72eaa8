use crate::core::rate_math::percent_to_fraction;
use serde::{Deserialize, Serialize};

/// Interest-rate environment for one calculation.
///
/// Rates are quoted in percent per annum (`4.5` = 4.5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexParams {
    pub domestic_rate: f64,
    pub foreign_rate: f64,
    pub months_to_hedge: u32,
}

impl Default for ForexParams {
    fn default() -> Self {
        Self {
            domestic_rate: 0.0,
            foreign_rate: 0.0,
            months_to_hedge: 12,
        }
    }
}

impl ForexParams {
    pub fn new(domestic_rate: f64, foreign_rate: f64, months_to_hedge: u32) -> Self {
        Self {
            domestic_rate,
            foreign_rate,
            months_to_hedge,
        }
    }

    /// Hedge horizon in years.
    pub fn horizon_years(&self) -> f64 {
        f64::from(self.months_to_hedge) / 12.0
    }

    pub fn domestic_fraction(&self) -> f64 {
        percent_to_fraction(self.domestic_rate)
    }

    pub fn foreign_fraction(&self) -> f64 {
        percent_to_fraction(self.foreign_rate)
    }

    /// No-arbitrage forward rate for a maturity of `t` years.
    ///
    /// Continuous compounding, consistent with the option pricer's discounting.
    pub fn forward_rate(&self, spot: f64, t: f64) -> f64 {
        spot * ((self.domestic_fraction() - self.foreign_fraction()) * t).exp()
    }
}

/// One scenario bucket of the risk matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    /// Probability of landing in this bucket, in percent.
    pub probability: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64, probability: f64) -> Self {
        Self {
            min,
            max,
            probability,
        }
    }

    /// Representative realized rate of the bucket.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Label used to key per-range results, e.g. `1.05-1.1`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}
