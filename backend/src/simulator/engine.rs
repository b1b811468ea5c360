//! Simulator Engine
//!
//! One tick mutates one randomly selected loan:
//!
//! ```text
//! 1. Pick a loan uniformly            (draw 1)
//! 2. Pick a catalog event uniformly   (draw 2)
//! 3. Apply the event's effect         (draws 3 and 4)
//! 4. Reclassify the primary covenant
//! 5. Pick an insight phrase for the new status (draw 5)
//! 6. Flag the loan as just updated
//! ```
//!
//! The draw order is fixed, so a scripted [`RandomSource`] reproduces a tick
//! exactly. The engine never reads the clock and never clears
//! `just_updated`; both belong to the caller.

use crate::events::{insight_for, phrase_count, ConfigError, EventImpact, ImpactBands, MarketEvent};
use crate::events::default_catalog;
use crate::models::{Loan, Portfolio, RiskStatus};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Simulator configuration: perturbation bands plus the event catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    #[serde(flatten)]
    pub bands: ImpactBands,

    /// Events drawn uniformly each tick
    pub events: Vec<MarketEvent>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            bands: ImpactBands::default(),
            events: default_catalog(),
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bands.validate()?;
        if self.events.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if let Some(event) = self.events.iter().find(|e| e.code.trim().is_empty()) {
            return Err(ConfigError::BlankEventCode {
                description: event.description.clone(),
            });
        }
        Ok(())
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Position of the mutated loan in the portfolio
    pub loan_index: usize,

    /// The mutated loan, after the update
    pub loan: Loan,

    /// The event that fired
    pub event: MarketEvent,

    pub impact: EventImpact,

    /// Primary covenant status before the event
    pub previous_status: RiskStatus,

    /// Short log line, e.g. "TechCorp Inc. risk increasing!"
    pub change_message: String,
}

impl TickOutcome {
    pub fn new_status(&self) -> RiskStatus {
        self.loan.primary_status()
    }

    pub fn status_changed(&self) -> bool {
        self.previous_status != self.new_status()
    }
}

/// Advance the portfolio by one tick.
///
/// Returns `None` (consuming no draws) when the portfolio is empty or the
/// catalog has no events.
///
/// # Example
/// ```
/// use covenant_guard_core::rng::SequenceSource;
/// use covenant_guard_core::simulator::{tick, SimulatorConfig};
/// use covenant_guard_core::{normalize, Portfolio, RiskStatus};
/// use serde_json::json;
///
/// let mut portfolio = Portfolio::from_loans(normalize(&json!([{
///     "id": "L1", "borrower_name": "GreenLeaf Energy", "amount": 5000000,
///     "covenants": [{ "name": "Leverage", "threshold": 2.0, "actual": 1.5 }]
/// }])));
///
/// // loan 0, CRASH, +0.2 actual, +500k amount, phrase 0
/// let mut rng = SequenceSource::new(vec![0.0, 0.0, 0.5, 0.5, 0.0]);
/// let outcome = tick(&mut portfolio, &mut rng, &SimulatorConfig::default()).unwrap();
///
/// assert_eq!(outcome.event.code, "CRASH");
/// assert_eq!(outcome.new_status(), RiskStatus::Watch);
/// assert_eq!(outcome.loan.amount(), 5_500_000.0);
/// ```
pub fn tick<R: RandomSource + ?Sized>(
    portfolio: &mut Portfolio,
    rng: &mut R,
    config: &SimulatorConfig,
) -> Option<TickOutcome> {
    if portfolio.is_empty() || config.events.is_empty() {
        return None;
    }

    let loan_index = rng.pick_index(portfolio.len());
    let event = &config.events[rng.pick_index(config.events.len())];
    let loan = portfolio.get_mut_at(loan_index)?;

    let effect = event.apply(loan, rng, &config.bands);

    let phrase = rng.pick_index(phrase_count(effect.new_status));
    loan.primary_covenant_mut()
        .set_insight(insight_for(effect.new_status, phrase, &event.description));
    loan.mark_updated();

    let change_message = change_message(loan.borrower_name(), effect.impact);

    debug!(
        loan_id = loan.id(),
        event = %event.code,
        previous_status = %effect.previous_status,
        new_status = %effect.new_status,
        actual = effect.new_actual,
        amount = effect.new_amount,
        "applied market event"
    );

    Some(TickOutcome {
        loan_index,
        loan: loan.clone(),
        event: event.clone(),
        impact: effect.impact,
        previous_status: effect.previous_status,
        change_message,
    })
}

fn change_message(borrower_name: &str, impact: EventImpact) -> String {
    match impact {
        EventImpact::Adverse => format!("{} risk increasing!", borrower_name),
        EventImpact::Favorable => format!("{} improving", borrower_name),
        EventImpact::Neutral => format!("{} updated", borrower_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;

    #[test]
    fn test_empty_portfolio_is_noop() {
        let mut portfolio = Portfolio::new();
        let mut rng = SequenceSource::new(vec![0.3]);

        assert!(tick(&mut portfolio, &mut rng, &SimulatorConfig::default()).is_none());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_empty_catalog_rejected_by_validate() {
        let config = SimulatorConfig {
            events: Vec::new(),
            ..SimulatorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyCatalog));
    }

    #[test]
    fn test_blank_event_code_rejected() {
        let config = SimulatorConfig {
            events: vec![MarketEvent::new(" ", "nothing")],
            ..SimulatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BlankEventCode { .. })
        ));
    }

    #[test]
    fn test_config_json_is_flat() {
        let config: SimulatorConfig =
            serde_json::from_str(r#"{ "max_actual": 3.0 }"#).unwrap();
        assert_eq!(config.bands.max_actual, 3.0);
        assert_eq!(config.bands.adverse_actual_max, 0.4);
        assert_eq!(config.events.len(), 6);
    }

    #[test]
    fn test_change_messages() {
        assert_eq!(
            change_message("Apex", EventImpact::Adverse),
            "Apex risk increasing!"
        );
        assert_eq!(change_message("Apex", EventImpact::Favorable), "Apex improving");
        assert_eq!(change_message("Apex", EventImpact::Neutral), "Apex updated");
    }
}
