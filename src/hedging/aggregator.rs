//! Combines weighted strategy legs into one premium and one payoff.
//!
//! Every leg is weighted by `quantity / 100` and the strategy total is scaled
//! by `coverage_ratio / 100`. Barrier legs are priced at vanilla cost; only
//! their payoff is conditioned on the barrier.

use crate::core::component::{ComponentKind, StrategyComponent};
use crate::core::market::ForexParams;
use crate::core::rate_math::percent_to_fraction;
use crate::pricing::barrier::BarrierEvaluator;
use crate::pricing::option_pricer::{OptionPricer, VanillaInputs};
use log::warn;
use serde::{Deserialize, Serialize};

/// Outcome of a strategy at one realized rate, per unit of notional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub realized_rate: f64,
    pub premium: f64,
    pub payoff: f64,
    /// `payoff - premium`.
    pub pnl: f64,
    /// `realized_rate + payoff - premium`.
    pub effective_rate: f64,
    /// Legs whose premium or payoff was non-finite and counted as zero.
    pub suppressed_defects: usize,
}

/// A priced strategy, ready to be evaluated at any realized rate.
#[derive(Debug, Clone)]
pub struct StrategyAggregate {
    components: Vec<StrategyComponent>,
    spot: f64,
    coverage: f64,
    leg_premiums: Vec<f64>,
    premium_per_unit: f64,
    suppressed_defects: usize,
}

/// Prices strategies leg by leg.
pub struct StrategyAggregator;

impl StrategyAggregator {
    /// Price `components` with the hedge horizon from `params` as maturity.
    pub fn aggregate(
        components: &[StrategyComponent],
        spot: f64,
        params: &ForexParams,
        coverage_ratio: f64,
    ) -> StrategyAggregate {
        Self::aggregate_with_maturity(
            components,
            spot,
            params,
            coverage_ratio,
            params.horizon_years(),
        )
    }

    /// Price `components` for an explicit maturity in years.
    pub fn aggregate_with_maturity(
        components: &[StrategyComponent],
        spot: f64,
        params: &ForexParams,
        coverage_ratio: f64,
        maturity: f64,
    ) -> StrategyAggregate {
        let mut suppressed_defects = 0;
        let leg_premiums: Vec<f64> = components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let raw = leg_premium(component, spot, params, maturity);
                let (premium, suppressed) =
                    absorb_non_finite(raw, index, component.kind, "premium");
                if suppressed {
                    suppressed_defects += 1;
                }
                premium * weight(component)
            })
            .collect();

        let coverage = percent_to_fraction(coverage_ratio);
        let premium_per_unit = leg_premiums.iter().sum::<f64>() * coverage;

        StrategyAggregate {
            components: components.to_vec(),
            spot,
            coverage,
            leg_premiums,
            premium_per_unit,
            suppressed_defects,
        }
    }
}

impl StrategyAggregate {
    /// Strategy premium per unit of notional, coverage applied.
    pub fn premium_per_unit(&self) -> f64 {
        self.premium_per_unit
    }

    /// Weighted premium of each leg before coverage scaling.
    pub fn leg_premiums(&self) -> &[f64] {
        &self.leg_premiums
    }

    /// Legs whose premium was non-finite and counted as zero.
    pub fn suppressed_defects(&self) -> usize {
        self.suppressed_defects
    }

    pub fn components(&self) -> &[StrategyComponent] {
        &self.components
    }

    /// Strategy payoff per unit of notional at `realized_rate`.
    pub fn payoff(&self, realized_rate: f64) -> f64 {
        self.payoff_counting_defects(realized_rate).0
    }

    /// `realized_rate + payoff - premium`.
    pub fn effective_rate(&self, realized_rate: f64) -> f64 {
        realized_rate + self.payoff(realized_rate) - self.premium_per_unit
    }

    /// Full breakdown of the strategy at one realized rate.
    pub fn scenario(&self, realized_rate: f64) -> ScenarioOutcome {
        let (payoff, payoff_defects) = self.payoff_counting_defects(realized_rate);
        let premium = self.premium_per_unit;
        ScenarioOutcome {
            realized_rate,
            premium,
            payoff,
            pnl: payoff - premium,
            effective_rate: realized_rate + payoff - premium,
            suppressed_defects: self.suppressed_defects + payoff_defects,
        }
    }

    fn payoff_counting_defects(&self, realized_rate: f64) -> (f64, usize) {
        let mut defects = 0;
        let total: f64 = self
            .components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                let raw = leg_payoff(component, realized_rate, self.spot);
                let (payoff, suppressed) =
                    absorb_non_finite(raw, index, component.kind, "payoff");
                if suppressed {
                    defects += 1;
                }
                payoff * weight(component)
            })
            .sum();
        (total * self.coverage, defects)
    }
}

fn weight(component: &StrategyComponent) -> f64 {
    percent_to_fraction(component.quantity)
}

/// Unweighted premium of one leg. Forwards are free.
fn leg_premium(
    component: &StrategyComponent,
    spot: f64,
    params: &ForexParams,
    maturity: f64,
) -> f64 {
    let Some(option_kind) = component.kind.option_kind() else {
        return 0.0;
    };
    let inputs = VanillaInputs {
        spot,
        strike: component.absolute_strike(spot),
        domestic_rate: params.domestic_fraction(),
        foreign_rate: params.foreign_fraction(),
        maturity,
        volatility: percent_to_fraction(component.volatility),
    };
    OptionPricer::price(option_kind, &inputs)
}

/// Unweighted payoff of one leg at `realized_rate`.
fn leg_payoff(component: &StrategyComponent, realized_rate: f64, spot: f64) -> f64 {
    let strike = component.absolute_strike(spot);
    match component.kind.option_kind() {
        None => strike - realized_rate,
        Some(option_kind) => {
            let vanilla = option_kind.intrinsic(realized_rate, strike);
            BarrierEvaluator::evaluate(component, realized_rate, vanilla, spot)
        }
    }
}

/// Replace a NaN/infinite leg value with zero and report it.
fn absorb_non_finite(value: f64, index: usize, kind: ComponentKind, what: &str) -> (f64, bool) {
    if value.is_finite() {
        (value, false)
    } else {
        warn!(
            "leg {} ({}) produced a non-finite {} ({}); counted as zero",
            index, kind, what, value
        );
        (0.0, true)
    }
}
