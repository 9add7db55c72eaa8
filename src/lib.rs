//! # fx-hedge-engine
//!
//! Pricing and evaluation engine for FX hedging strategies.
//!
//! A strategy is a set of weighted forward and option legs, optionally
//! barrier-conditional. The engine prices the legs with Garman-Kohlhagen,
//! resolves their payoffs at a realized rate and aggregates the result in
//! three ways: a single scenario, a probability-weighted risk matrix over
//! price ranges, and a month-by-month historical backtest.
//!
//! ## Architecture
//!
//! - **core** — Strategy legs, market parameters, errors, rate helpers
//! - **pricing** — Normal distribution, option pricer, barrier evaluator
//! - **hedging** — Strategy aggregation and the risk matrix
//! - **history** — Rate ingestion, monthly statistics, backtest, CSV export
//! - **simulation** — Synthetic rate series
//!
//! Every operation is a pure function of its inputs.

pub mod core;
pub mod hedging;
pub mod history;
pub mod pricing;
pub mod simulation;

use crate::core::component::{OptionKind, StrategyComponent};
use crate::core::error::{HedgeError, HedgeResult};
use crate::core::market::ForexParams;
use crate::hedging::aggregator::{ScenarioOutcome, StrategyAggregator};
use crate::hedging::risk_matrix::{RiskMatrixGenerator, RiskMatrixRequest, RiskMatrixResult};
use crate::history::backtest::{BacktestConfig, BacktestReport, Backtester};
use crate::history::series::HistoricalSeries;
use crate::pricing::barrier::BarrierEvaluator;
use crate::pricing::option_pricer::{OptionPricer, VanillaInputs};

/// Price a vanilla FX option.
///
/// # Examples
///
/// ```
/// use fx_hedge_engine::core::component::OptionKind;
/// use fx_hedge_engine::pricing::option_pricer::VanillaInputs;
///
/// let inputs = VanillaInputs {
///     spot: 1.10,
///     strike: 1.10,
///     domestic_rate: 0.04,
///     foreign_rate: 0.02,
///     maturity: 1.0,
///     volatility: 0.08,
/// };
/// let premium = fx_hedge_engine::price_option(OptionKind::Call, &inputs).unwrap();
/// assert!(premium > 0.0);
/// ```
pub fn price_option(kind: OptionKind, inputs: &VanillaInputs) -> HedgeResult<f64> {
    OptionPricer::try_price(kind, inputs)
}

/// Apply a leg's barrier condition to its vanilla payoff.
pub fn evaluate_barrier_payoff(
    component: &StrategyComponent,
    realized_rate: f64,
    vanilla_payoff: f64,
    reference_spot: f64,
) -> HedgeResult<f64> {
    component.validate(0)?;
    Ok(BarrierEvaluator::evaluate(
        component,
        realized_rate,
        vanilla_payoff,
        reference_spot,
    ))
}

/// Evaluate a strategy at a single realized rate.
pub fn evaluate_scenario(
    components: &[StrategyComponent],
    spot: f64,
    params: &ForexParams,
    coverage_ratio: f64,
    realized_rate: f64,
) -> HedgeResult<ScenarioOutcome> {
    if components.is_empty() {
        return Err(HedgeError::configuration("strategy has no components"));
    }
    if !coverage_ratio.is_finite() {
        return Err(HedgeError::configuration("coverage ratio must be finite"));
    }
    for (index, component) in components.iter().enumerate() {
        component.validate(index)?;
    }
    let aggregate = StrategyAggregator::aggregate(components, spot, params, coverage_ratio);
    Ok(aggregate.scenario(realized_rate))
}

/// Run the probability-weighted risk matrix.
pub fn generate_risk_matrix(request: &RiskMatrixRequest) -> HedgeResult<Vec<RiskMatrixResult>> {
    RiskMatrixGenerator::generate(request)
}

/// Backtest a strategy over a historical series.
pub fn run_backtest(
    components: &[StrategyComponent],
    series: &HistoricalSeries,
    config: &BacktestConfig,
) -> HedgeResult<BacktestReport> {
    Backtester::run(components, series, config)
}

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::component::{
        ComponentKind, MatrixStrategy, OptionKind, StrategyComponent, StrikeType,
    };
    pub use crate::core::error::{HedgeError, HedgeResult};
    pub use crate::core::market::{ForexParams, PriceRange};
    pub use crate::hedging::aggregator::{ScenarioOutcome, StrategyAggregator};
    pub use crate::hedging::risk_matrix::{RiskMatrixRequest, RiskMatrixResult};
    pub use crate::history::backtest::{BacktestConfig, BacktestReport, ForexResult};
    pub use crate::history::series::{parse_historical_data, HistoricalSeries, IngestOptions};
    pub use crate::pricing::option_pricer::VanillaInputs;
    pub use crate::{
        evaluate_barrier_payoff, evaluate_scenario, generate_risk_matrix, price_option,
        run_backtest,
    };
}
