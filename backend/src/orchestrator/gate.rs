//! Single-writer tick gate
//!
//! Timer-driven ticks and portfolio loads share one mutable portfolio. The
//! gate is a latch: while a tick or load holds it, any re-trigger is
//! refused instead of interleaving.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-reentrant latch shared between the coordinator and its schedulers.
///
/// # Example
/// ```
/// use covenant_guard_core::orchestrator::TickGate;
///
/// let gate = TickGate::new();
/// let guard = gate.try_acquire().unwrap();
/// assert!(gate.try_acquire().is_none());
/// drop(guard);
/// assert!(!gate.is_held());
/// ```
#[derive(Debug, Default)]
pub struct TickGate {
    in_flight: AtomicBool,
}

impl TickGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the latch, or `None` if a tick or load is already in flight.
    pub fn try_acquire(self: &Arc<Self>) -> Option<TickGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TickGuard {
                gate: Arc::clone(self),
            })
    }

    pub fn is_held(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct TickGuard {
    gate: Arc<TickGate>,
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let gate = TickGate::new();
        {
            let _guard = gate.try_acquire().unwrap();
            assert!(gate.is_held());
        }
        assert!(!gate.is_held());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_shared_across_threads() {
        let gate = TickGate::new();
        let guard = gate.try_acquire().unwrap();

        let remote = Arc::clone(&gate);
        let acquired = std::thread::spawn(move || remote.try_acquire().is_some())
            .join()
            .unwrap();

        assert!(!acquired);
        drop(guard);
    }
}
