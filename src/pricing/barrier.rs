//! Knock-in / knock-out payoff resolution.
//!
//! Barriers are checked against a single realized rate, which stands in for
//! the extremum of the path. There is no intermediate path simulation, so
//! this is a point-in-time approximation rather than continuous monitoring.

use crate::core::component::{BarrierEffect, StrategyComponent};

/// Resolves barrier conditions on strategy legs.
pub struct BarrierEvaluator;

impl BarrierEvaluator {
    /// Whether `realized_rate` breaches the leg's barrier(s).
    ///
    /// Single barriers: an upper level is breached at or above it, a lower
    /// level at or below it. Double barriers are breached when the rate
    /// leaves `[lower, upper]`. Legs without barrier levels are never breached.
    pub fn is_breached(
        component: &StrategyComponent,
        realized_rate: f64,
        reference_spot: f64,
    ) -> bool {
        let upper = component
            .upper_barrier
            .map(|b| b.resolve(reference_spot));
        let lower = component
            .lower_barrier
            .map(|b| b.resolve(reference_spot));

        if component.kind.is_double_barrier() {
            return match (lower, upper) {
                (Some(lo), Some(hi)) => realized_rate < lo || realized_rate > hi,
                _ => false,
            };
        }

        match (upper, lower) {
            (Some(hi), None) => realized_rate >= hi,
            (None, Some(lo)) => realized_rate <= lo,
            _ => false,
        }
    }

    /// Payoff of a leg after applying its barrier condition.
    ///
    /// | family   | breached       | not breached   |
    /// |----------|----------------|----------------|
    /// | knock-out| 0              | vanilla payoff |
    /// | knock-in | vanilla payoff | 0              |
    ///
    /// Non-barrier legs return `vanilla_payoff` unchanged.
    pub fn evaluate(
        component: &StrategyComponent,
        realized_rate: f64,
        vanilla_payoff: f64,
        reference_spot: f64,
    ) -> f64 {
        let Some(effect) = component.kind.barrier_effect() else {
            return vanilla_payoff;
        };
        let breached = Self::is_breached(component, realized_rate, reference_spot);
        match (effect, breached) {
            (BarrierEffect::KnockOut, true) | (BarrierEffect::KnockIn, false) => 0.0,
            (BarrierEffect::KnockOut, false) | (BarrierEffect::KnockIn, true) => vanilla_payoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::{ComponentKind, StrikeType};

    fn leg(kind: ComponentKind) -> StrategyComponent {
        StrategyComponent::option(kind, 100.0, StrikeType::Absolute, 10.0, 100.0)
    }

    fn double(kind: ComponentKind) -> StrategyComponent {
        leg(kind)
            .with_lower_barrier(90.0, StrikeType::Absolute)
            .with_upper_barrier(110.0, StrikeType::Absolute)
    }

    #[test]
    fn test_double_knock_out() {
        let dko = double(ComponentKind::CallDoubleKnockOut);
        assert_eq!(BarrierEvaluator::evaluate(&dko, 150.0, 50.0, 100.0), 0.0);
        assert_eq!(BarrierEvaluator::evaluate(&dko, 100.0, 7.5, 100.0), 7.5);
        assert_eq!(BarrierEvaluator::evaluate(&dko, 85.0, 3.0, 100.0), 0.0);
    }

    #[test]
    fn test_double_knock_in() {
        let dki = double(ComponentKind::PutDoubleKnockIn);
        assert_eq!(BarrierEvaluator::evaluate(&dki, 80.0, 20.0, 100.0), 20.0);
        assert_eq!(BarrierEvaluator::evaluate(&dki, 95.0, 5.0, 100.0), 0.0);
    }

    #[test]
    fn test_double_barrier_edges_are_inside() {
        let dko = double(ComponentKind::PutDoubleKnockOut);
        assert_eq!(BarrierEvaluator::evaluate(&dko, 90.0, 10.0, 100.0), 10.0);
        assert_eq!(BarrierEvaluator::evaluate(&dko, 110.0, 1.0, 100.0), 1.0);
    }

    #[test]
    fn test_up_and_out_call() {
        let ko = leg(ComponentKind::CallKnockOut).with_upper_barrier(120.0, StrikeType::Absolute);
        assert_eq!(BarrierEvaluator::evaluate(&ko, 115.0, 15.0, 100.0), 15.0);
        assert_eq!(BarrierEvaluator::evaluate(&ko, 120.0, 20.0, 100.0), 0.0);
        assert_eq!(BarrierEvaluator::evaluate(&ko, 130.0, 30.0, 100.0), 0.0);
    }

    #[test]
    fn test_down_and_in_put() {
        let ki = leg(ComponentKind::PutKnockIn).with_lower_barrier(85.0, StrikeType::Absolute);
        assert_eq!(BarrierEvaluator::evaluate(&ki, 90.0, 10.0, 100.0), 0.0);
        assert_eq!(BarrierEvaluator::evaluate(&ki, 80.0, 20.0, 100.0), 20.0);
    }

    #[test]
    fn test_percent_barrier_fixed_at_reference_spot() {
        // 120% of an inception spot of 1.00 is 1.20, regardless of the realized rate.
        let ko = leg(ComponentKind::CallKnockOut).with_upper_barrier(120.0, StrikeType::Percent);
        assert_eq!(BarrierEvaluator::evaluate(&ko, 1.19, 0.19, 1.0), 0.19);
        assert_eq!(BarrierEvaluator::evaluate(&ko, 1.25, 0.25, 1.0), 0.0);
    }

    #[test]
    fn test_vanilla_leg_passes_through() {
        let call = leg(ComponentKind::Call);
        assert_eq!(BarrierEvaluator::evaluate(&call, 500.0, 400.0, 100.0), 400.0);
    }
}
