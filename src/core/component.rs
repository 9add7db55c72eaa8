use crate::core::error::{HedgeError, HedgeResult};
use crate::core::rate_math::resolve_strike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a strike or barrier level is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrikeType {
    /// Percentage of the spot rate at strategy inception.
    #[default]
    Percent,
    /// Absolute exchange rate.
    Absolute,
}

/// Vanilla option direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Exercise value at `rate` for a given absolute strike.
    pub fn intrinsic(self, rate: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (rate - strike).max(0.0),
            OptionKind::Put => (strike - rate).max(0.0),
        }
    }
}

/// What a barrier does to the leg once it is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierEffect {
    KnockOut,
    KnockIn,
}

/// Leg type of a hedging strategy.
///
/// Wire names follow the calculator's strategy format (`callKO`, `putDKI`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "forward")]
    Forward,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "put")]
    Put,
    #[serde(rename = "callKO")]
    CallKnockOut,
    #[serde(rename = "putKO")]
    PutKnockOut,
    #[serde(rename = "callKI")]
    CallKnockIn,
    #[serde(rename = "putKI")]
    PutKnockIn,
    #[serde(rename = "callDKO")]
    CallDoubleKnockOut,
    #[serde(rename = "putDKO")]
    PutDoubleKnockOut,
    #[serde(rename = "callDKI")]
    CallDoubleKnockIn,
    #[serde(rename = "putDKI")]
    PutDoubleKnockIn,
}

impl ComponentKind {
    /// The vanilla option underlying this leg, `None` for a forward.
    pub fn option_kind(self) -> Option<OptionKind> {
        use ComponentKind::*;
        match self {
            Forward => None,
            Call | CallKnockOut | CallKnockIn | CallDoubleKnockOut | CallDoubleKnockIn => {
                Some(OptionKind::Call)
            }
            Put | PutKnockOut | PutKnockIn | PutDoubleKnockOut | PutDoubleKnockIn => {
                Some(OptionKind::Put)
            }
        }
    }

    pub fn barrier_effect(self) -> Option<BarrierEffect> {
        use ComponentKind::*;
        match self {
            CallKnockOut | PutKnockOut | CallDoubleKnockOut | PutDoubleKnockOut => {
                Some(BarrierEffect::KnockOut)
            }
            CallKnockIn | PutKnockIn | CallDoubleKnockIn | PutDoubleKnockIn => {
                Some(BarrierEffect::KnockIn)
            }
            Forward | Call | Put => None,
        }
    }

    pub fn is_barrier(self) -> bool {
        self.barrier_effect().is_some()
    }

    pub fn is_double_barrier(self) -> bool {
        use ComponentKind::*;
        matches!(
            self,
            CallDoubleKnockOut | PutDoubleKnockOut | CallDoubleKnockIn | PutDoubleKnockIn
        )
    }

    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        use ComponentKind::*;
        match self {
            Forward => "forward",
            Call => "call",
            Put => "put",
            CallKnockOut => "callKO",
            PutKnockOut => "putKO",
            CallKnockIn => "callKI",
            PutKnockIn => "putKI",
            CallDoubleKnockOut => "callDKO",
            PutDoubleKnockOut => "putDKO",
            CallDoubleKnockIn => "callDKI",
            PutDoubleKnockIn => "putDKI",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A barrier level and how it is quoted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierLevel {
    pub level: f64,
    pub level_type: StrikeType,
}

impl BarrierLevel {
    pub fn new(level: f64, level_type: StrikeType) -> Self {
        Self { level, level_type }
    }

    /// Absolute barrier rate, fixed against the inception spot.
    pub fn resolve(&self, reference_spot: f64) -> f64 {
        resolve_strike(self.level, self.level_type, reference_spot)
    }
}

/// One leg of a hedging strategy.
///
/// `volatility` and `quantity` are both percentages: a leg with
/// `quantity = 50` covers half of the hedged notional.
///
/// # Examples
///
/// ```
/// use fx_hedge_engine::core::component::{ComponentKind, StrategyComponent, StrikeType};
///
/// let leg = StrategyComponent::option(ComponentKind::CallKnockOut, 100.0, StrikeType::Percent, 10.0, 100.0)
///     .with_upper_barrier(120.0, StrikeType::Percent);
/// assert!(leg.validate(0).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ComponentWire", into = "ComponentWire")]
pub struct StrategyComponent {
    pub kind: ComponentKind,
    pub strike: f64,
    pub strike_type: StrikeType,
    pub upper_barrier: Option<BarrierLevel>,
    pub lower_barrier: Option<BarrierLevel>,
    pub volatility: f64,
    pub quantity: f64,
}

/// Flat JSON shape of a leg: each barrier is a level plus a sibling
/// `*BarrierType` field.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentWire {
    #[serde(rename = "type")]
    kind: ComponentKind,
    strike: f64,
    #[serde(default)]
    strike_type: StrikeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upper_barrier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upper_barrier_type: Option<StrikeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lower_barrier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lower_barrier_type: Option<StrikeType>,
    #[serde(default)]
    volatility: f64,
    quantity: f64,
}

impl From<ComponentWire> for StrategyComponent {
    fn from(wire: ComponentWire) -> Self {
        let barrier = |level: Option<f64>, level_type: Option<StrikeType>| {
            level.map(|level| BarrierLevel::new(level, level_type.unwrap_or_default()))
        };
        Self {
            kind: wire.kind,
            strike: wire.strike,
            strike_type: wire.strike_type,
            upper_barrier: barrier(wire.upper_barrier, wire.upper_barrier_type),
            lower_barrier: barrier(wire.lower_barrier, wire.lower_barrier_type),
            volatility: wire.volatility,
            quantity: wire.quantity,
        }
    }
}

impl From<StrategyComponent> for ComponentWire {
    fn from(component: StrategyComponent) -> Self {
        Self {
            kind: component.kind,
            strike: component.strike,
            strike_type: component.strike_type,
            upper_barrier: component.upper_barrier.map(|b| b.level),
            upper_barrier_type: component.upper_barrier.map(|b| b.level_type),
            lower_barrier: component.lower_barrier.map(|b| b.level),
            lower_barrier_type: component.lower_barrier.map(|b| b.level_type),
            volatility: component.volatility,
            quantity: component.quantity,
        }
    }
}

impl StrategyComponent {
    /// A forward leg. Forwards carry no volatility and no premium.
    pub fn forward(strike: f64, strike_type: StrikeType, quantity: f64) -> Self {
        Self {
            kind: ComponentKind::Forward,
            strike,
            strike_type,
            upper_barrier: None,
            lower_barrier: None,
            volatility: 0.0,
            quantity,
        }
    }

    /// An option leg of any kind; barrier levels are attached separately.
    pub fn option(
        kind: ComponentKind,
        strike: f64,
        strike_type: StrikeType,
        volatility: f64,
        quantity: f64,
    ) -> Self {
        Self {
            kind,
            strike,
            strike_type,
            upper_barrier: None,
            lower_barrier: None,
            volatility,
            quantity,
        }
    }

    pub fn with_upper_barrier(mut self, level: f64, level_type: StrikeType) -> Self {
        self.upper_barrier = Some(BarrierLevel::new(level, level_type));
        self
    }

    pub fn with_lower_barrier(mut self, level: f64, level_type: StrikeType) -> Self {
        self.lower_barrier = Some(BarrierLevel::new(level, level_type));
        self
    }

    /// Same leg with a different volatility (percent).
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Absolute strike against the inception spot.
    pub fn absolute_strike(&self, spot: f64) -> f64 {
        resolve_strike(self.strike, self.strike_type, spot)
    }

    /// Check the barrier invariants for this leg.
    ///
    /// Single-barrier kinds take exactly one level, double-barrier kinds take
    /// both, and non-barrier kinds take none. `index` only labels the error.
    pub fn validate(&self, index: usize) -> HedgeResult<()> {
        let label = || format!("component {} ({})", index, self.kind);

        if !self.strike.is_finite() {
            return Err(HedgeError::configuration(format!(
                "{}: strike must be finite",
                label()
            )));
        }
        if !self.quantity.is_finite() {
            return Err(HedgeError::configuration(format!(
                "{}: quantity must be finite",
                label()
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(HedgeError::configuration(format!(
                "{}: volatility must be a non-negative percentage, got {}",
                label(),
                self.volatility
            )));
        }

        let barriers = (self.upper_barrier.is_some(), self.lower_barrier.is_some());
        if self.kind.is_double_barrier() {
            if barriers != (true, true) {
                return Err(HedgeError::configuration(format!(
                    "{}: double barrier requires both upper and lower levels",
                    label()
                )));
            }
        } else if self.kind.is_barrier() {
            if barriers.0 == barriers.1 {
                return Err(HedgeError::configuration(format!(
                    "{}: single barrier requires exactly one of upper or lower level",
                    label()
                )));
            }
        } else if barriers != (false, false) {
            return Err(HedgeError::configuration(format!(
                "{}: barrier levels are only allowed on knock-in/knock-out legs",
                label()
            )));
        }
        Ok(())
    }
}

/// A named strategy variant evaluated by the risk matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStrategy {
    pub name: String,
    /// Percent of the notional hedged (100 = fully hedged).
    pub coverage_ratio: f64,
    pub components: Vec<StrategyComponent>,
}

impl MatrixStrategy {
    pub fn new(
        name: impl Into<String>,
        coverage_ratio: f64,
        components: Vec<StrategyComponent>,
    ) -> Self {
        Self {
            name: name.into(),
            coverage_ratio,
            components,
        }
    }

    /// Seed a matrix entry from the working strategy.
    ///
    /// The legs are copied, so later edits to either side stay independent.
    pub fn from_components(
        name: impl Into<String>,
        coverage_ratio: f64,
        components: &[StrategyComponent],
    ) -> Self {
        Self::new(name, coverage_ratio, components.to_vec())
    }
}
