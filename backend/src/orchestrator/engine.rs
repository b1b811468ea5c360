//! Orchestrator Engine
//!
//! The coordinating object that owns all session state:
//! - The portfolio (replaced wholesale on each load)
//! - The random source driving the simulator
//! - The simulation-active flag and tick counter
//! - The session event log
//! - The shared [`TickGate`] enforcing a single writer
//!
//! # Tick flow
//!
//! ```text
//! timer fires → tick()
//!   1. refuse if the simulation is stopped  (NotRunning)
//!   2. refuse if a tick or load holds the gate  (TickInFlight)
//!   3. simulator::tick on the portfolio
//!   4. stamp last_updated on the mutated loan
//!   5. log the market event, advance the tick counter
//! ```
//!
//! # Example
//!
//! ```rust
//! use covenant_guard_core::orchestrator::{Orchestrator, OrchestratorConfig};
//!
//! let config = OrchestratorConfig {
//!     rng_seed: Some(42),
//!     ..OrchestratorConfig::default()
//! };
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! orchestrator.load_fallback().unwrap();
//! orchestrator.start_simulation();
//!
//! for _ in 0..10 {
//!     let outcome = orchestrator.tick().unwrap().unwrap();
//!     println!("{} {}", outcome.event.description, outcome.change_message);
//! }
//! assert_eq!(orchestrator.current_tick(), 10);
//! ```

use crate::aggregate::{filter_loans, sort_by_risk_with, summarize_with, PortfolioStats, RankingBasis};
use crate::events::ConfigError;
use crate::models::event::DEFAULT_EVENT_LOG_CAPACITY;
use crate::models::{Event, EventLog, LoadSource, Loan, Portfolio};
use crate::normalize::{fallback_records, normalize};
use crate::orchestrator::gate::TickGate;
use crate::responder::respond;
use crate::rng::{RandomSource, RngManager};
use crate::simulator::{self, SimulatorConfig, TickOutcome};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete orchestrator configuration
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// RNG seed; `None` seeds from OS entropy
    pub rng_seed: Option<u64>,

    /// Cadence the external timer should use between ticks
    pub tick_interval_ms: u64,

    /// Number of session events retained
    pub event_log_capacity: usize,

    /// Which covenant status drives ranking and counting
    pub ranking_basis: RankingBasis,

    /// Perturbation bands and event catalog
    pub simulator: SimulatorConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            tick_interval_ms: 2_500,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            ranking_basis: RankingBasis::PrimaryCovenant,
            simulator: SimulatorConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.tick_interval_ms == 0 {
            return Err(SimulationError::InvalidConfig(
                "tick_interval_ms must be > 0".to_string(),
            ));
        }

        if self.event_log_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "event_log_capacity must be > 0".to_string(),
            ));
        }

        self.simulator.validate()?;
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Coordinator error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid simulator config: {0}")]
    InvalidSimulatorConfig(#[from] ConfigError),

    /// A tick was requested after the simulation was stopped
    #[error("Simulation is not running")]
    NotRunning,

    /// Another tick or load currently holds the gate
    #[error("A tick or load is already in flight")]
    TickInFlight,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),

    #[error("Config mismatch: checkpoint was taken with config {expected}, got {actual}")]
    ConfigMismatch { expected: String, actual: String },
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Coordinating object owning the portfolio and simulation state.
///
/// Generic over the random source so tests can inject a scripted sequence;
/// production uses the seeded [`RngManager`].
pub struct Orchestrator<R: RandomSource = RngManager> {
    config: OrchestratorConfig,
    portfolio: Portfolio,
    rng: R,
    simulating: bool,
    current_tick: usize,
    event_log: EventLog,
    gate: Arc<TickGate>,
}

impl Orchestrator<RngManager> {
    /// Create an orchestrator seeded from `config.rng_seed` (or entropy).
    pub fn new(config: OrchestratorConfig) -> Result<Self, SimulationError> {
        let rng = match config.rng_seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        Self::with_source(config, rng)
    }

    /// Current RNG state (for checkpointing/replay)
    pub fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }
}

impl<R: RandomSource> Orchestrator<R> {
    /// Create an orchestrator with an explicit random source.
    pub fn with_source(config: OrchestratorConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(Self {
            event_log: EventLog::with_capacity(config.event_log_capacity),
            config,
            portfolio: Portfolio::new(),
            rng,
            simulating: false,
            current_tick: 0,
            gate: TickGate::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn loans(&self) -> &[Loan] {
        self.portfolio.loans()
    }

    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Handle to the shared gate, for schedulers that need to observe it.
    pub fn tick_gate(&self) -> Arc<TickGate> {
        Arc::clone(&self.gate)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Normalize raw upstream records and replace the portfolio.
    ///
    /// Returns the number of loans loaded.
    pub fn load_raw(&mut self, raw: &Value) -> Result<usize, SimulationError> {
        self.load(normalize(raw), LoadSource::External)
    }

    /// Replace the portfolio with the built-in demo data set.
    pub fn load_fallback(&mut self) -> Result<usize, SimulationError> {
        self.load(normalize(&fallback_records()), LoadSource::Fallback)
    }

    fn load(&mut self, loans: Vec<Loan>, source: LoadSource) -> Result<usize, SimulationError> {
        let _guard = self
            .gate
            .try_acquire()
            .ok_or(SimulationError::TickInFlight)?;

        let loan_count = loans.len();
        self.portfolio.replace(loans);
        self.event_log
            .log(Event::PortfolioLoaded { loan_count, source });

        info!(loan_count, ?source, "portfolio loaded");
        Ok(loan_count)
    }

    // ========================================================================
    // Simulation Control
    // ========================================================================

    pub fn start_simulation(&mut self) {
        if self.simulating {
            return;
        }
        self.simulating = true;
        self.event_log.log(Event::SimulationStarted {
            tick: self.current_tick,
        });
        info!(tick = self.current_tick, "simulation started");
    }

    /// Stop the simulation. Any tick already scheduled by an external timer
    /// will be refused with [`SimulationError::NotRunning`].
    pub fn stop_simulation(&mut self) {
        if !self.simulating {
            return;
        }
        self.simulating = false;
        self.event_log.log(Event::SimulationPaused {
            tick: self.current_tick,
        });
        info!(tick = self.current_tick, "simulation paused");
    }

    /// Flip the simulation state; returns the new state.
    pub fn toggle_simulation(&mut self) -> bool {
        if self.simulating {
            self.stop_simulation();
        } else {
            self.start_simulation();
        }
        self.simulating
    }

    // ========================================================================
    // Tick Loop
    // ========================================================================

    /// Execute one simulation tick.
    ///
    /// Returns `Ok(None)` when the portfolio is empty (nothing to mutate).
    pub fn tick(&mut self) -> Result<Option<TickOutcome>, SimulationError> {
        if !self.simulating {
            return Err(SimulationError::NotRunning);
        }

        let _guard = self
            .gate
            .try_acquire()
            .ok_or(SimulationError::TickInFlight)?;

        let Some(mut outcome) =
            simulator::tick(&mut self.portfolio, &mut self.rng, &self.config.simulator)
        else {
            debug!(tick = self.current_tick, "tick skipped: empty portfolio");
            return Ok(None);
        };

        let now = Utc::now();
        if let Some(loan) = self.portfolio.get_mut_at(outcome.loan_index) {
            loan.touch(now);
        }
        outcome.loan.touch(now);

        self.event_log.log(Event::MarketEventApplied {
            tick: self.current_tick,
            loan_id: outcome.loan.id().to_string(),
            borrower_name: outcome.loan.borrower_name().to_string(),
            event_code: outcome.event.code.clone(),
            description: outcome.event.description.clone(),
            change_message: outcome.change_message.clone(),
            status: outcome.new_status(),
        });
        self.current_tick += 1;

        Ok(Some(outcome))
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Loans in risk order (view only; the portfolio keeps input order).
    pub fn sorted_loans(&self) -> Vec<&Loan> {
        sort_by_risk_with(self.portfolio.loans(), self.config.ranking_basis)
    }

    pub fn stats(&self) -> PortfolioStats {
        summarize_with(self.portfolio.loans(), self.config.ranking_basis)
    }

    pub fn filtered_loans(&self, term: &str) -> Vec<&Loan> {
        filter_loans(self.portfolio.loans(), term)
    }

    /// Answer a chat query against the live portfolio.
    pub fn respond(&self, query: &str) -> String {
        respond(query, self.portfolio.loans(), self.simulating)
    }

    /// Clear `just_updated` after the presentation layer has shown it.
    pub fn clear_update_flags(&mut self) {
        self.portfolio.clear_update_flags();
    }

    // ========================================================================
    // Checkpoint Support
    // ========================================================================

    pub(crate) fn from_parts(
        config: OrchestratorConfig,
        rng: R,
        portfolio: Portfolio,
        current_tick: usize,
        simulating: bool,
    ) -> Result<Self, SimulationError> {
        let mut orchestrator = Self::with_source(config, rng)?;
        let loan_count = portfolio.len();
        orchestrator.portfolio = portfolio;
        orchestrator.current_tick = current_tick;
        orchestrator.simulating = simulating;
        orchestrator.event_log.log(Event::PortfolioLoaded {
            loan_count,
            source: LoadSource::Checkpoint,
        });
        Ok(orchestrator)
    }
}
