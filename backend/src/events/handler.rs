//! Market event effects
//!
//! Applies one event to a loan's primary covenant and amount:
//!
//! ```text
//! Adverse:   actual += U(0, a)                amount = original + U(0, A)
//! Favorable: actual  = max(0, actual - U(0, f)) amount = max(0, original - U(0, F))
//! Neutral:   actual += U(-s, s)               amount = original + U(-S, S)
//! then:      actual clamped to [0, max_actual], amount clamped to >= 0
//! ```
//!
//! Exactly two draws are consumed: the actual delta, then the amount delta.

use crate::events::types::{EventImpact, MarketEvent};
use crate::models::{Loan, RiskStatus};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulator configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_actual must be > 0 (got {0})")]
    NonPositiveMaxActual(f64),

    #[error("{name} must be finite and >= 0 (got {value})")]
    InvalidBand { name: &'static str, value: f64 },

    #[error("event catalog must not be empty")]
    EmptyCatalog,

    #[error("event codes must not be blank (description: {description:?})")]
    BlankEventCode { description: String },
}

/// Perturbation bands for each impact class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactBands {
    /// Upper clamp for a covenant's actual ratio
    pub max_actual: f64,
    pub adverse_actual_max: f64,
    pub favorable_actual_max: f64,
    pub neutral_actual_spread: f64,
    pub adverse_amount_max: f64,
    pub favorable_amount_max: f64,
    pub neutral_amount_spread: f64,
}

impl Default for ImpactBands {
    fn default() -> Self {
        Self {
            max_actual: 2.0,
            adverse_actual_max: 0.4,
            favorable_actual_max: 0.3,
            neutral_actual_spread: 0.1,
            adverse_amount_max: 1_000_000.0,
            favorable_amount_max: 500_000.0,
            neutral_amount_spread: 250_000.0,
        }
    }
}

impl ImpactBands {
    /// Every band must be finite and non-negative; `max_actual` must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_actual.is_finite() && self.max_actual > 0.0) {
            return Err(ConfigError::NonPositiveMaxActual(self.max_actual));
        }

        let bands = [
            ("adverse_actual_max", self.adverse_actual_max),
            ("favorable_actual_max", self.favorable_actual_max),
            ("neutral_actual_spread", self.neutral_actual_spread),
            ("adverse_amount_max", self.adverse_amount_max),
            ("favorable_amount_max", self.favorable_amount_max),
            ("neutral_amount_spread", self.neutral_amount_spread),
        ];
        for (name, value) in bands {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidBand { name, value });
            }
        }

        Ok(())
    }
}

/// Before/after values of one applied event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedEffect {
    pub impact: EventImpact,
    pub previous_actual: f64,
    pub new_actual: f64,
    pub previous_amount: f64,
    pub new_amount: f64,
    pub previous_status: RiskStatus,
    pub new_status: RiskStatus,
}

impl MarketEvent {
    /// Apply this event to `loan`, drawing from `rng`.
    ///
    /// Mutates the primary covenant's actual (and hence its status) and the
    /// loan amount. Insight text and the update flag are left to the caller.
    pub fn apply<R: RandomSource + ?Sized>(
        &self,
        loan: &mut Loan,
        rng: &mut R,
        bands: &ImpactBands,
    ) -> AppliedEffect {
        let impact = self.impact();
        let original = loan.original_amount();
        let previous_amount = loan.amount();
        let covenant = loan.primary_covenant_mut();
        let previous_actual = covenant.actual();
        let previous_status = covenant.status();

        let (raw_actual, raw_amount) = match impact {
            EventImpact::Adverse => {
                let actual = previous_actual + rng.uniform(0.0, bands.adverse_actual_max);
                let amount = original + rng.uniform(0.0, bands.adverse_amount_max);
                (actual, amount)
            }
            EventImpact::Favorable => {
                let actual =
                    (previous_actual - rng.uniform(0.0, bands.favorable_actual_max)).max(0.0);
                let amount =
                    (original - rng.uniform(0.0, bands.favorable_amount_max)).max(0.0);
                (actual, amount)
            }
            EventImpact::Neutral => {
                let spread = bands.neutral_actual_spread;
                let actual = previous_actual + rng.uniform(-spread, spread);
                let spread = bands.neutral_amount_spread;
                let amount = original + rng.uniform(-spread, spread);
                (actual, amount)
            }
        };

        let new_actual = clamp_actual(raw_actual, bands.max_actual);
        covenant.set_actual(new_actual);
        let new_status = covenant.status();

        loan.set_amount(raw_amount);

        AppliedEffect {
            impact,
            previous_actual,
            new_actual,
            previous_amount,
            new_amount: loan.amount(),
            previous_status,
            new_status,
        }
    }
}

fn clamp_actual(actual: f64, max_actual: f64) -> f64 {
    if actual.is_nan() {
        return 0.0;
    }
    actual.clamp(0.0, max_actual)
}
