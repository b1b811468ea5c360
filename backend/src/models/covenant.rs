//! Covenant model and risk classification
//!
//! A covenant is a financial ratio test (e.g. Debt/EBITDA) attached to a loan.
//! Its status is derived from `(actual, threshold)` and can never be set
//! directly.
//!
//! # Classification
//!
//! ```text
//! actual > threshold              → Critical
//! threshold * 0.8 < actual        → Watch
//! otherwise                       → Safe
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of the threshold at which a covenant enters the Watch band.
pub const WATCH_RATIO: f64 = 0.8;

/// Ratio bars are capped at this percentage of the threshold.
const MAX_RATIO_PERCENT: f64 = 150.0;

/// Risk tier of a covenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskStatus {
    Safe,
    Watch,
    Critical,
}

impl RiskStatus {
    /// Sort priority: Critical(3) > Watch(2) > Safe(1).
    pub fn priority(self) -> u8 {
        match self {
            RiskStatus::Critical => 3,
            RiskStatus::Watch => 2,
            RiskStatus::Safe => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskStatus::Critical => "Critical",
            RiskStatus::Watch => "Watch",
            RiskStatus::Safe => "Safe",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a covenant from its actual ratio and compliance threshold.
///
/// Total and deterministic. No division is performed, so a zero threshold
/// simply empties the Watch band; NaN compares false everywhere and lands
/// in Safe.
///
/// # Example
/// ```
/// use covenant_guard_core::{classify, RiskStatus};
///
/// assert_eq!(classify(4.2, 3.5), RiskStatus::Critical);
/// assert_eq!(classify(1.8, 2.0), RiskStatus::Watch);
/// assert_eq!(classify(1.2, 1.5), RiskStatus::Safe);
/// ```
pub fn classify(actual: f64, threshold: f64) -> RiskStatus {
    if actual > threshold {
        RiskStatus::Critical
    } else if actual > threshold * WATCH_RATIO {
        RiskStatus::Watch
    } else {
        RiskStatus::Safe
    }
}

/// A covenant attached to a loan.
///
/// `status` is cached but only ever written by [`Covenant::reclassify`],
/// which every mutator calls. Deserialization ignores any incoming status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CovenantRecord")]
pub struct Covenant {
    name: String,
    threshold: f64,
    actual: f64,
    status: RiskStatus,
    insight: String,
}

/// Wire shape accepted when deserializing a covenant; `status` is dropped.
#[derive(Deserialize)]
struct CovenantRecord {
    name: String,
    threshold: f64,
    actual: f64,
    #[serde(default)]
    insight: String,
}

impl From<CovenantRecord> for Covenant {
    fn from(record: CovenantRecord) -> Self {
        Covenant::new(record.name, record.threshold, record.actual, record.insight)
    }
}

impl Covenant {
    /// Create a covenant; status is computed from `actual` and `threshold`.
    pub fn new(
        name: impl Into<String>,
        threshold: f64,
        actual: f64,
        insight: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            threshold,
            actual,
            status: classify(actual, threshold),
            insight: insight.into(),
        }
    }

    /// Placeholder used when a loan arrives without covenant data.
    pub fn default_synthetic() -> Self {
        Self::new("Default Covenant", 1.0, 0.5, "No covenant data available")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    pub fn status(&self) -> RiskStatus {
        self.status
    }

    pub fn insight(&self) -> &str {
        &self.insight
    }

    pub fn set_actual(&mut self, actual: f64) {
        self.actual = actual;
        self.reclassify();
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
        self.reclassify();
    }

    pub fn set_insight(&mut self, insight: impl Into<String>) {
        self.insight = insight.into();
    }

    /// Actual as a percentage of threshold, capped at 150%.
    pub fn ratio_percent(&self) -> f64 {
        if self.threshold <= 0.0 {
            return 0.0;
        }
        (self.actual / self.threshold * 100.0).min(MAX_RATIO_PERCENT)
    }

    fn reclassify(&mut self) {
        self.status = classify(self.actual, self.threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(2.0, 2.0), RiskStatus::Watch);
        assert_eq!(classify(2.000_001, 2.0), RiskStatus::Critical);
        assert_eq!(classify(1.6, 2.0), RiskStatus::Safe);
        assert_eq!(classify(1.600_001, 2.0), RiskStatus::Watch);
    }

    #[test]
    fn test_classify_zero_threshold() {
        assert_eq!(classify(0.0, 0.0), RiskStatus::Safe);
        assert_eq!(classify(0.01, 0.0), RiskStatus::Critical);
    }

    #[test]
    fn test_classify_nan_is_safe() {
        assert_eq!(classify(f64::NAN, 1.0), RiskStatus::Safe);
    }

    #[test]
    fn test_setters_reclassify() {
        let mut covenant = Covenant::new("Debt/EBITDA", 3.5, 1.0, "");
        assert_eq!(covenant.status(), RiskStatus::Safe);

        covenant.set_actual(3.0);
        assert_eq!(covenant.status(), RiskStatus::Watch);

        covenant.set_threshold(2.5);
        assert_eq!(covenant.status(), RiskStatus::Critical);
    }

    #[test]
    fn test_deserialize_discards_status() {
        let json = r#"{"name":"Leverage","threshold":2.0,"actual":2.5,"status":"Safe","insight":"x"}"#;
        let covenant: Covenant = serde_json::from_str(json).unwrap();
        assert_eq!(covenant.status(), RiskStatus::Critical);
    }

    #[test]
    fn test_ratio_percent_capped() {
        let covenant = Covenant::new("Leverage", 1.0, 5.0, "");
        assert_eq!(covenant.ratio_percent(), 150.0);

        let zero = Covenant::new("Leverage", 0.0, 5.0, "");
        assert_eq!(zero.ratio_percent(), 0.0);
    }

    #[test]
    fn test_priority_order() {
        assert!(RiskStatus::Critical.priority() > RiskStatus::Watch.priority());
        assert!(RiskStatus::Watch.priority() > RiskStatus::Safe.priority());
    }
}
