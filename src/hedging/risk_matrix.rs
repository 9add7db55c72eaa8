//! Probability-weighted evaluation of strategies across price scenarios.
//!
//! Each price range is represented by its midpoint; there is no sampling
//! inside a bucket. A run is validated as a whole before anything is
//! computed, so a rejected run never yields partial rows.

use crate::core::component::{MatrixStrategy, StrategyComponent};
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::market::{ForexParams, PriceRange};
use crate::core::rate_math::percent_to_fraction;
use crate::hedging::aggregator::StrategyAggregator;
use log::debug;
use serde::{Deserialize, Serialize};

/// Allowed deviation of the summed range probabilities from 100%.
pub const PROBABILITY_TOLERANCE: f64 = 0.01;

/// Everything needed for one matrix run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMatrixRequest {
    /// Spot rate at inception; strikes and barriers resolve against it.
    pub spot: f64,
    pub params: ForexParams,
    pub strategies: Vec<MatrixStrategy>,
    pub ranges: Vec<PriceRange>,
}

/// One strategy × range cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeOutcome {
    pub range_key: String,
    pub probability: f64,
    pub realized_rate: f64,
    pub payoff: f64,
    pub pnl: f64,
    pub effective_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCosts {
    /// Premium per unit, coverage applied.
    pub total_premium: f64,
}

/// Matrix row for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMatrixResult {
    pub name: String,
    pub coverage_ratio: f64,
    /// Expected P&L per unit across all ranges.
    pub hedging_cost: f64,
    pub expected_effective_rate: f64,
    pub costs: StrategyCosts,
    /// Per-range outcomes in the order the ranges were declared.
    pub differences: Vec<RangeOutcome>,
    pub strategy: Vec<StrategyComponent>,
    pub suppressed_defects: usize,
}

impl RiskMatrixResult {
    /// Effective rate for the range with the given key.
    pub fn difference(&self, range_key: &str) -> Option<f64> {
        self.differences
            .iter()
            .find(|o| o.range_key == range_key)
            .map(|o| o.effective_rate)
    }

    /// Effective rates in range order.
    pub fn effective_rates(&self) -> Vec<f64> {
        self.differences.iter().map(|o| o.effective_rate).collect()
    }
}

/// Builds the strategy × scenario grid.
pub struct RiskMatrixGenerator;

impl RiskMatrixGenerator {
    /// Check that the ranges form a complete probability distribution.
    pub fn validate_ranges(ranges: &[PriceRange]) -> HedgeResult<()> {
        if ranges.is_empty() {
            return Err(HedgeError::configuration(
                "at least one price range is required",
            ));
        }
        for (index, range) in ranges.iter().enumerate() {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(HedgeError::configuration(format!(
                    "price range {} has invalid bounds [{}, {}]",
                    index, range.min, range.max
                )));
            }
            if !range.probability.is_finite() || range.probability < 0.0 {
                return Err(HedgeError::configuration(format!(
                    "price range {} has invalid probability {}",
                    index, range.probability
                )));
            }
        }

        let total: f64 = ranges.iter().map(|r| r.probability).sum();
        if (total - 100.0).abs() > PROBABILITY_TOLERANCE {
            return Err(HedgeError::ProbabilityMismatch { total });
        }
        Ok(())
    }

    /// Validate the whole request without computing anything.
    pub fn validate(request: &RiskMatrixRequest) -> HedgeResult<()> {
        if request.strategies.is_empty() {
            return Err(HedgeError::configuration(
                "at least one matrix strategy is required",
            ));
        }
        if !request.spot.is_finite() || request.spot <= 0.0 {
            return Err(HedgeError::configuration(format!(
                "spot rate must be positive, got {}",
                request.spot
            )));
        }
        Self::validate_ranges(&request.ranges)?;
        for strategy in &request.strategies {
            if !strategy.coverage_ratio.is_finite() {
                return Err(HedgeError::configuration(format!(
                    "strategy '{}': coverage ratio must be finite, got {}",
                    strategy.name, strategy.coverage_ratio
                )));
            }
            for (index, component) in strategy.components.iter().enumerate() {
                component.validate(index).map_err(|e| {
                    HedgeError::configuration(format!("strategy '{}': {}", strategy.name, e))
                })?;
            }
        }
        Ok(())
    }

    /// Evaluate every strategy against every range.
    ///
    /// Rows follow the strategy order of the request; each row's outcomes
    /// follow the range order.
    pub fn generate(request: &RiskMatrixRequest) -> HedgeResult<Vec<RiskMatrixResult>> {
        Self::validate(request)?;
        debug!(
            "generating risk matrix: {} strategies x {} ranges",
            request.strategies.len(),
            request.ranges.len()
        );

        let rows = request
            .strategies
            .iter()
            .map(|strategy| Self::evaluate_strategy(strategy, request))
            .collect();
        Ok(rows)
    }

    fn evaluate_strategy(strategy: &MatrixStrategy, request: &RiskMatrixRequest) -> RiskMatrixResult {
        let aggregate = StrategyAggregator::aggregate(
            &strategy.components,
            request.spot,
            &request.params,
            strategy.coverage_ratio,
        );

        let mut expected_pnl = 0.0;
        let mut expected_effective_rate = 0.0;
        let mut suppressed_defects = aggregate.suppressed_defects();
        let mut differences = Vec::with_capacity(request.ranges.len());

        for range in &request.ranges {
            let outcome = aggregate.scenario(range.midpoint());
            let weight = percent_to_fraction(range.probability);
            expected_pnl += outcome.pnl * weight;
            expected_effective_rate += outcome.effective_rate * weight;
            suppressed_defects += outcome.suppressed_defects - aggregate.suppressed_defects();

            differences.push(RangeOutcome {
                range_key: range.key(),
                probability: range.probability,
                realized_rate: outcome.realized_rate,
                payoff: outcome.payoff,
                pnl: outcome.pnl,
                effective_rate: outcome.effective_rate,
            });
        }

        RiskMatrixResult {
            name: strategy.name.clone(),
            coverage_ratio: strategy.coverage_ratio,
            hedging_cost: expected_pnl,
            expected_effective_rate,
            costs: StrategyCosts {
                total_premium: aggregate.premium_per_unit(),
            },
            differences,
            strategy: strategy.components.clone(),
            suppressed_defects,
        }
    }
}
