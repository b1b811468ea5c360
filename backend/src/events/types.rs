//! Market event types
//!
//! # Design Principles
//!
//! 1. **Named catalog**: events are data (code + description), so a config
//!    can extend the catalog without code changes
//! 2. **Impact by code**: the effect class is derived from the code;
//!    unrecognized codes are neutral
//! 3. **Self-contained**: the description is echoed into insights and logs

use serde::{Deserialize, Serialize};

/// A named market event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Catalog code, e.g. `"CRASH"`
    pub code: String,
    /// Human-readable text echoed into insights and logs
    pub description: String,
}

impl MarketEvent {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn impact(&self) -> EventImpact {
        EventImpact::for_code(&self.code)
    }
}

/// Effect class of a market event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventImpact {
    /// Ratio and amount rise (CRASH, DEBT)
    Adverse,
    /// Ratio and amount fall (BOOM, PAY)
    Favorable,
    /// Small symmetric jitter (MERGED, AUDIT, anything unrecognized)
    Neutral,
}

impl EventImpact {
    /// Codes are matched case-insensitively.
    pub fn for_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "CRASH" | "DEBT" => EventImpact::Adverse,
            "BOOM" | "PAY" => EventImpact::Favorable,
            _ => EventImpact::Neutral,
        }
    }
}

/// The built-in catalog: CRASH, BOOM, DEBT, PAY, MERGED, AUDIT.
pub fn default_catalog() -> Vec<MarketEvent> {
    vec![
        MarketEvent::new("CRASH", "Market Crash! Asset values dropping."),
        MarketEvent::new("BOOM", "Revenue Spike! Strong results."),
        MarketEvent::new("DEBT", "New Debt Acquired. Leverage increasing."),
        MarketEvent::new("PAY", "Loan Repayment Processed."),
        MarketEvent::new("MERGED", "M&A Activity Reported"),
        MarketEvent::new("AUDIT", "Financial Audit Complete"),
    ]
}
