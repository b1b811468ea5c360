//! CovenantGuard Core - Portfolio Risk Engine
//!
//! Classifies loan covenants, aggregates portfolio risk, simulates market
//! events and answers canned portfolio queries. No UI, network or storage
//! dependencies.
//!
//! # Architecture
//!
//! - **models**: Domain types (Covenant, Loan, Portfolio, EventLog)
//! - **normalize**: Raw upstream records → canonical loans
//! - **aggregate**: Risk ordering and summary statistics
//! - **events**: Market event catalog and effect rules
//! - **simulator**: One-tick state transition
//! - **responder**: Text query → canned answer
//! - **orchestrator**: Session coordinator, tick gate, checkpoints
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. A covenant's status is always `classify(actual, threshold)`
//! 2. Every loan has at least one covenant
//! 3. All simulator randomness comes from an injected `RandomSource`
//! 4. The core functions are total: malformed input is defaulted, never fatal

// Module declarations
pub mod aggregate;
pub mod core;
pub mod events;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod responder;
pub mod rng;
pub mod simulator;

// Re-exports for convenience
pub use aggregate::{
    filter_loans, sort_by_risk, summarize, PortfolioStats, RankingBasis, StatusDistribution,
};
pub use core::money::format_currency;
pub use events::{ConfigError, EventImpact, MarketEvent};
pub use models::{
    covenant::{classify, Covenant, RiskStatus},
    event::{Event, EventLog, LoadSource},
    loan::Loan,
    portfolio::Portfolio,
};
pub use normalize::{fallback_records, normalize, normalize_at};
pub use orchestrator::{Orchestrator, OrchestratorConfig, SimulationError, StateSnapshot};
pub use responder::respond;
pub use rng::{RandomSource, RngManager, SequenceSource};
pub use simulator::{tick, SimulatorConfig, TickOutcome};
