//! Orchestrator - session coordinator
//!
//! Owns the portfolio and drives the simulator on behalf of an external
//! timer, enforcing a single writer through [`TickGate`].
//!
//! See `engine.rs` for the tick flow.

pub mod checkpoint;
pub mod engine;
pub mod gate;

// Re-export main types for convenience
pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
pub use engine::{Orchestrator, OrchestratorConfig, SimulationError};
pub use gate::{TickGate, TickGuard};
