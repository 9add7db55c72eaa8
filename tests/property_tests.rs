use fx_hedge_engine::core::component::{
    ComponentKind, MatrixStrategy, OptionKind, StrategyComponent, StrikeType,
};
use fx_hedge_engine::core::error::HedgeError;
use fx_hedge_engine::core::market::{ForexParams, PriceRange};
use fx_hedge_engine::core::rate_math::annualized_volatility;
use fx_hedge_engine::hedging::aggregator::StrategyAggregator;
use fx_hedge_engine::hedging::risk_matrix::{RiskMatrixGenerator, RiskMatrixRequest};
use fx_hedge_engine::pricing::option_pricer::{OptionPricer, VanillaInputs};
use proptest::prelude::*;

/// Generate valid Garman-Kohlhagen inputs with positive time and volatility.
fn arb_inputs() -> impl Strategy<Value = VanillaInputs> {
    (
        0.5f64..2.0,
        0.5f64..2.0,
        -0.02f64..0.10,
        -0.02f64..0.10,
        0.01f64..3.0,
        0.01f64..0.6,
    )
        .prop_map(|(spot, strike, domestic_rate, foreign_rate, maturity, volatility)| {
            VanillaInputs {
                spot,
                strike,
                domestic_rate,
                foreign_rate,
                maturity,
                volatility,
            }
        })
}

/// Generate a single non-barrier leg.
fn arb_plain_leg() -> impl Strategy<Value = StrategyComponent> {
    (
        prop::sample::select(vec![ComponentKind::Forward, ComponentKind::Call, ComponentKind::Put]),
        80.0f64..120.0,
        1.0f64..30.0,
        0.0f64..100.0,
    )
        .prop_map(|(kind, strike, vol, qty)| match kind {
            ComponentKind::Forward => StrategyComponent::forward(strike, StrikeType::Percent, qty),
            _ => StrategyComponent::option(kind, strike, StrikeType::Percent, vol, qty),
        })
}

/// Generate a double-barrier leg with lower < upper.
fn arb_double_barrier_leg() -> impl Strategy<Value = StrategyComponent> {
    (
        prop::sample::select(vec![
            ComponentKind::CallDoubleKnockOut,
            ComponentKind::PutDoubleKnockOut,
            ComponentKind::CallDoubleKnockIn,
            ComponentKind::PutDoubleKnockIn,
        ]),
        85.0f64..95.0,
        105.0f64..120.0,
    )
        .prop_map(|(kind, lower, upper)| {
            StrategyComponent::option(kind, 100.0, StrikeType::Percent, 10.0, 100.0)
                .with_lower_barrier(lower, StrikeType::Percent)
                .with_upper_barrier(upper, StrikeType::Percent)
        })
}

fn arb_leg() -> impl Strategy<Value = StrategyComponent> {
    prop_oneof![3 => arb_plain_leg(), 1 => arb_double_barrier_leg()]
}

/// Generate 1..6 ranges whose probabilities sum to exactly 100.
fn arb_ranges() -> impl Strategy<Value = Vec<PriceRange>> {
    prop::collection::vec(1u32..50, 1..6).prop_map(|weights| {
        let total: u32 = weights.iter().sum();
        let mut start = 0.90;
        let mut ranges: Vec<PriceRange> = weights
            .iter()
            .map(|w| {
                let range = PriceRange::new(start, start + 0.05, f64::from(*w) * 100.0 / f64::from(total));
                start += 0.05;
                range
            })
            .collect();
        // Put the rounding residue on the last bucket.
        let assigned: f64 = ranges.iter().map(|r| r.probability).sum();
        if let Some(last) = ranges.last_mut() {
            last.probability += 100.0 - assigned;
        }
        ranges
    })
}

fn request(legs: Vec<StrategyComponent>, ranges: Vec<PriceRange>) -> RiskMatrixRequest {
    RiskMatrixRequest {
        spot: 1.10,
        params: ForexParams::new(4.0, 2.0, 6),
        strategies: vec![MatrixStrategy::new("Generated", 100.0, legs)],
        ranges,
    }
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Put-call parity.
    //
    // call - put = S·e^(-r_f·t) - K·e^(-r_d·t) for every t > 0, σ > 0.
    // ===================================================================
    #[test]
    fn put_call_parity_holds(inputs in arb_inputs()) {
        let call = OptionPricer::price(OptionKind::Call, &inputs);
        let put = OptionPricer::price(OptionKind::Put, &inputs);
        let forward_value =
            inputs.spot * inputs.discount_foreign() - inputs.strike * inputs.discount_domestic();
        prop_assert!(
            (call - put - forward_value).abs() < 1e-6,
            "call {} - put {} != {}",
            call, put, forward_value
        );
    }

    // ===================================================================
    // INVARIANT 2: No time or no volatility means intrinsic value, exactly.
    // ===================================================================
    #[test]
    fn degenerate_inputs_price_intrinsic(mut inputs in arb_inputs(), zero_time in any::<bool>()) {
        if zero_time {
            inputs.maturity = 0.0;
        } else {
            inputs.volatility = 0.0;
        }
        prop_assert_eq!(
            OptionPricer::price(OptionKind::Call, &inputs),
            (inputs.spot - inputs.strike).max(0.0)
        );
        prop_assert_eq!(
            OptionPricer::price(OptionKind::Put, &inputs),
            (inputs.strike - inputs.spot).max(0.0)
        );
    }

    // ===================================================================
    // INVARIANT 3: Effective rate identity.
    //
    // effective = realized + payoff - premium, exactly, for every rate.
    // ===================================================================
    #[test]
    fn effective_rate_identity(
        legs in prop::collection::vec(arb_leg(), 1..5),
        coverage in 0.0f64..150.0,
        realized in 0.8f64..1.4,
    ) {
        let agg = StrategyAggregator::aggregate(&legs, 1.10, &ForexParams::new(3.0, 1.0, 9), coverage);
        let outcome = agg.scenario(realized);
        prop_assert_eq!(outcome.effective_rate, realized + outcome.payoff - outcome.premium);
        prop_assert_eq!(outcome.suppressed_defects, 0);
    }

    // ===================================================================
    // INVARIANT 4: Full probability mass is accepted, in range order.
    // ===================================================================
    #[test]
    fn complete_distribution_accepted(
        legs in prop::collection::vec(arb_leg(), 1..4),
        ranges in arb_ranges(),
    ) {
        let req = request(legs, ranges.clone());
        let rows = RiskMatrixGenerator::generate(&req);
        prop_assert!(rows.is_ok(), "rejected: {:?}", rows.err());
        let rows = rows.unwrap();
        let keys: Vec<String> = rows[0].differences.iter().map(|d| d.range_key.clone()).collect();
        let expected: Vec<String> = ranges.iter().map(|r| r.key()).collect();
        prop_assert_eq!(keys, expected);
    }

    // ===================================================================
    // INVARIANT 5: Probability mass off by more than 0.01 is rejected.
    // ===================================================================
    #[test]
    fn incomplete_distribution_rejected(
        ranges in arb_ranges(),
        shift in prop_oneof![-20.0f64..-0.02, 0.02f64..20.0],
    ) {
        let mut ranges = ranges;
        let first = &mut ranges[0];
        first.probability = (first.probability + shift).max(0.0);
        let total: f64 = ranges.iter().map(|r| r.probability).sum();
        prop_assume!((total - 100.0).abs() > 0.011);

        let req = request(vec![StrategyComponent::forward(100.0, StrikeType::Percent, 100.0)], ranges);
        let is_mismatch = matches!(
            RiskMatrixGenerator::generate(&req),
            Err(HedgeError::ProbabilityMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    // ===================================================================
    // INVARIANT 6: Volatility is non-negative and zero for flat prices.
    // ===================================================================
    #[test]
    fn volatility_non_negative(prices in prop::collection::vec(0.5f64..2.0, 2..40)) {
        let vol = annualized_volatility(&prices);
        prop_assert!(vol.is_some());
        prop_assert!(vol.unwrap() >= 0.0);
    }

    #[test]
    fn flat_prices_have_zero_volatility(price in 0.5f64..2.0, n in 2usize..30) {
        prop_assert_eq!(annualized_volatility(&vec![price; n]), Some(0.0));
    }
}
