//! Checkpoint - Save/Load Session State
//!
//! Serializes the complete coordinator state (portfolio, tick counter, RNG
//! state) so a session can be paused and resumed, or replayed exactly.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored engine replays the same ticks as the original
//! - **Loan Uniqueness**: each loan id appears exactly once
//! - **Finite Values**: amounts and covenant ratios are finite; amounts are >= 0
//! - **Config Matching**: state can only be loaded with a matching config

use crate::models::{Loan, Portfolio};
use crate::orchestrator::engine::{Orchestrator, OrchestratorConfig, SimulationError};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::info;

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete coordinator state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Ticks applied so far
    pub current_tick: usize,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    /// Whether the simulation was running
    pub simulating: bool,

    /// All loans, in portfolio order
    pub loans: Vec<Loan>,

    /// SHA256 hash of the config in force (for validation)
    pub config_hash: String,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of a config
///
/// Uses canonical JSON (recursively sorted object keys) so the hash does not
/// depend on field or map ordering.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Covenant non-emptiness and status consistency are already guaranteed by
/// `Loan`/`Covenant` deserialization; this checks the cross-loan invariants.
pub fn validate_snapshot(snapshot: &StateSnapshot) -> Result<(), SimulationError> {
    let mut seen = HashSet::new();

    for loan in &snapshot.loans {
        if !seen.insert(loan.id()) {
            return Err(SimulationError::StateValidationError(format!(
                "Duplicate loan id: {}",
                loan.id()
            )));
        }

        for (label, value) in [
            ("amount", loan.amount()),
            ("original_amount", loan.original_amount()),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::StateValidationError(format!(
                    "Loan {} has invalid {}: {}",
                    loan.id(),
                    label,
                    value
                )));
            }
        }

        for covenant in loan.covenants() {
            if !covenant.actual().is_finite() || !covenant.threshold().is_finite() {
                return Err(SimulationError::StateValidationError(format!(
                    "Loan {} covenant '{}' has non-finite values",
                    loan.id(),
                    covenant.name()
                )));
            }
        }
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl Orchestrator<RngManager> {
    /// Capture the current state.
    pub fn snapshot(&self) -> Result<StateSnapshot, SimulationError> {
        Ok(StateSnapshot {
            current_tick: self.current_tick(),
            rng_state: self.rng_state(),
            simulating: self.is_simulating(),
            loans: self.loans().to_vec(),
            config_hash: compute_config_hash(self.config())?,
        })
    }

    /// Serialize the current state to JSON.
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = self.snapshot()?;
        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Restore from a snapshot taken with the same config.
    pub fn restore(
        config: OrchestratorConfig,
        snapshot: StateSnapshot,
    ) -> Result<Self, SimulationError> {
        let actual = compute_config_hash(&config)?;
        if actual != snapshot.config_hash {
            return Err(SimulationError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual,
            });
        }

        validate_snapshot(&snapshot)?;

        info!(
            tick = snapshot.current_tick,
            loans = snapshot.loans.len(),
            "restoring from checkpoint"
        );

        Orchestrator::from_parts(
            config,
            RngManager::new(snapshot.rng_state),
            Portfolio::from_loans(snapshot.loans),
            snapshot.current_tick,
            snapshot.simulating,
        )
    }

    /// Deserialize JSON produced by [`Orchestrator::save_state`] and restore.
    pub fn load_state(config: OrchestratorConfig, json: &str) -> Result<Self, SimulationError> {
        let snapshot: StateSnapshot = serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot deserialization failed: {}", e))
        })?;
        Self::restore(config, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_config_hash_deterministic() {
        let hash1 = compute_config_hash(&OrchestratorConfig::default()).unwrap();
        let hash2 = compute_config_hash(&OrchestratorConfig::default()).unwrap();

        assert_eq!(hash1, hash2, "Same config should produce same hash");
    }

    #[test]
    fn test_compute_config_hash_different_for_different_configs() {
        let config1 = OrchestratorConfig::default();
        let config2 = OrchestratorConfig {
            tick_interval_ms: 1_000,
            ..OrchestratorConfig::default()
        };

        assert_ne!(
            compute_config_hash(&config1).unwrap(),
            compute_config_hash(&config2).unwrap(),
            "Different configs should produce different hashes"
        );
    }
}
