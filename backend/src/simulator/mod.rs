//! Event Simulator
//!
//! Advances the portfolio one discrete tick at a time. The caller owns the
//! cadence (timer) and the random source.

pub mod engine;

pub use engine::{tick, SimulatorConfig, TickOutcome};
