//! Session event log
//!
//! Records what happened to the portfolio: loads, simulation start/stop and
//! every applied market event. The log is bounded; the oldest entries are
//! evicted first.
//!
//! # Example
//!
//! ```rust
//! use covenant_guard_core::models::{Event, EventLog, LoadSource};
//!
//! let mut log = EventLog::with_capacity(2);
//! log.log(Event::PortfolioLoaded { loan_count: 3, source: LoadSource::Fallback });
//! log.log(Event::SimulationStarted { tick: 0 });
//! log.log(Event::SimulationPaused { tick: 4 });
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.latest().map(Event::event_type), Some("SimulationPaused"));
//! ```

use crate::models::covenant::RiskStatus;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained events.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 50;

/// Where a loaded portfolio came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// Records supplied by the caller (e.g. an upstream API payload)
    External,
    /// The built-in demo data set
    Fallback,
    /// Restored from a checkpoint
    Checkpoint,
}

/// A recorded session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PortfolioLoaded {
        loan_count: usize,
        source: LoadSource,
    },

    SimulationStarted {
        tick: usize,
    },

    SimulationPaused {
        tick: usize,
    },

    /// A market event moved one loan's primary covenant
    MarketEventApplied {
        tick: usize,
        loan_id: String,
        borrower_name: String,
        event_code: String,
        description: String,
        change_message: String,
        status: RiskStatus,
    },
}

impl Event {
    /// Tick at which the event occurred, if it is tick-scoped.
    pub fn tick(&self) -> Option<usize> {
        match self {
            Event::PortfolioLoaded { .. } => None,
            Event::SimulationStarted { tick }
            | Event::SimulationPaused { tick }
            | Event::MarketEventApplied { tick, .. } => Some(*tick),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PortfolioLoaded { .. } => "PortfolioLoaded",
            Event::SimulationStarted { .. } => "SimulationStarted",
            Event::SimulationPaused { .. } => "SimulationPaused",
            Event::MarketEventApplied { .. } => "MarketEventApplied",
        }
    }

    /// One-line rendering for a game-log style feed.
    pub fn summary(&self) -> String {
        match self {
            Event::PortfolioLoaded { loan_count, source } => {
                format!("Loaded {} loans ({:?})", loan_count, source)
            }
            Event::SimulationStarted { .. } => "Simulation Engine Started".to_string(),
            Event::SimulationPaused { .. } => "Simulation Paused".to_string(),
            Event::MarketEventApplied {
                description,
                change_message,
                ..
            } => format!("> {} {}", description, change_message),
        }
    }
}

/// Bounded, ordered event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events from oldest to newest.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&Event> {
        self.events.back()
    }

    pub fn events_of_type<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events
            .iter()
            .filter(move |event| event.event_type() == event_type)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_evicted_first() {
        let mut log = EventLog::with_capacity(3);
        for tick in 0..5 {
            log.log(Event::SimulationStarted { tick });
        }

        let ticks: Vec<_> = log.events().filter_map(Event::tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut log = EventLog::with_capacity(0);
        log.log(Event::SimulationStarted { tick: 1 });
        log.log(Event::SimulationPaused { tick: 2 });

        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().and_then(Event::tick), Some(2));
    }

    #[test]
    fn test_market_event_summary() {
        let event = Event::MarketEventApplied {
            tick: 3,
            loan_id: "demo-1".to_string(),
            borrower_name: "TechCorp Inc.".to_string(),
            event_code: "CRASH".to_string(),
            description: "Market Crash! Asset values dropping.".to_string(),
            change_message: "TechCorp Inc. risk increasing!".to_string(),
            status: RiskStatus::Critical,
        };

        assert_eq!(
            event.summary(),
            "> Market Crash! Asset values dropping. TechCorp Inc. risk increasing!"
        );
    }
}
