//! Garman-Kohlhagen pricing of European FX options.
//!
//! The foreign interest rate plays the role of a continuous dividend yield:
//!
//! ```text
//! d1   = (ln(S/K) + (r_d - r_f + σ²/2)·t) / (σ·√t)
//! d2   = d1 - σ·√t
//! call = S·e^(-r_f·t)·N(d1) - K·e^(-r_d·t)·N(d2)
//! put  = K·e^(-r_d·t)·N(-d2) - S·e^(-r_f·t)·N(-d1)
//! ```

use crate::core::component::OptionKind;
use crate::core::error::{HedgeError, HedgeResult};
use crate::pricing::normal::norm_cdf;
use serde::{Deserialize, Serialize};

/// Inputs to a single vanilla pricing.
///
/// Rates and volatility are decimal fractions (`0.05` = 5%), maturity is in
/// years and `strike` is an absolute exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanillaInputs {
    pub spot: f64,
    pub strike: f64,
    pub domestic_rate: f64,
    pub foreign_rate: f64,
    pub maturity: f64,
    pub volatility: f64,
}

impl VanillaInputs {
    pub fn discount_domestic(&self) -> f64 {
        (-self.domestic_rate * self.maturity).exp()
    }

    pub fn discount_foreign(&self) -> f64 {
        (-self.foreign_rate * self.maturity).exp()
    }

    fn is_degenerate(&self) -> bool {
        self.maturity <= 0.0 || self.volatility <= 0.0
    }
}

/// Closed-form two-currency option pricer.
pub struct OptionPricer;

impl OptionPricer {
    /// Premium per unit of foreign notional, in domestic currency.
    ///
    /// With no time left or no volatility the option is worth its
    /// undiscounted intrinsic value. Invalid inputs (non-positive strike or
    /// spot) propagate as NaN; use [`OptionPricer::try_price`] to surface them.
    pub fn price(kind: OptionKind, inputs: &VanillaInputs) -> f64 {
        if inputs.is_degenerate() {
            return kind.intrinsic(inputs.spot, inputs.strike);
        }

        let sig_sqrt_t = inputs.volatility * inputs.maturity.sqrt();
        let d1 = ((inputs.spot / inputs.strike).ln()
            + (inputs.domestic_rate - inputs.foreign_rate
                + 0.5 * inputs.volatility * inputs.volatility)
                * inputs.maturity)
            / sig_sqrt_t;
        let d2 = d1 - sig_sqrt_t;

        let spot_leg = inputs.spot * inputs.discount_foreign();
        let strike_leg = inputs.strike * inputs.discount_domestic();

        match kind {
            OptionKind::Call => spot_leg * norm_cdf(d1) - strike_leg * norm_cdf(d2),
            OptionKind::Put => strike_leg * norm_cdf(-d2) - spot_leg * norm_cdf(-d1),
        }
    }

    /// Like [`OptionPricer::price`], but reports a non-finite result as
    /// [`HedgeError::Numeric`].
    pub fn try_price(kind: OptionKind, inputs: &VanillaInputs) -> HedgeResult<f64> {
        let premium = Self::price(kind, inputs);
        if premium.is_finite() {
            Ok(premium)
        } else {
            Err(HedgeError::Numeric {
                context: format!(
                    "{:?} pricing (spot {}, strike {}, t {}, vol {})",
                    kind, inputs.spot, inputs.strike, inputs.maturity, inputs.volatility
                ),
            })
        }
    }
}
