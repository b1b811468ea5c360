//! Canned insight phrases
//!
//! A pure table lookup: the caller supplies the index (drawn from the
//! injected random source), so phrase selection never touches ambient
//! randomness.

use crate::models::RiskStatus;

const CRITICAL_PHRASES: [&str; 3] = [
    "Immediate action required",
    "Breach imminent",
    "Emergency measures needed",
];

const WATCH_PHRASES: [&str; 3] = [
    "Close monitoring advised",
    "Approaching limits",
    "Watch condition",
];

const SAFE_PHRASES: [&str; 3] = [
    "Within acceptable ranges",
    "No immediate concerns",
    "Healthy metrics maintained",
];

fn phrases(status: RiskStatus) -> &'static [&'static str] {
    match status {
        RiskStatus::Critical => &CRITICAL_PHRASES,
        RiskStatus::Watch => &WATCH_PHRASES,
        RiskStatus::Safe => &SAFE_PHRASES,
    }
}

/// Number of phrase variants for a status.
pub fn phrase_count(status: RiskStatus) -> usize {
    phrases(status).len()
}

/// `"<phrase> - <event description>"`. Out-of-range indices wrap.
///
/// # Example
/// ```
/// use covenant_guard_core::events::insight_for;
/// use covenant_guard_core::RiskStatus;
///
/// assert_eq!(
///     insight_for(RiskStatus::Watch, 1, "Market Crash! Asset values dropping."),
///     "Approaching limits - Market Crash! Asset values dropping."
/// );
/// ```
pub fn insight_for(status: RiskStatus, index: usize, description: &str) -> String {
    let table = phrases(status);
    format!("{} - {}", table[index % table.len()], description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_variants_per_status() {
        for status in [RiskStatus::Critical, RiskStatus::Watch, RiskStatus::Safe] {
            assert!(phrase_count(status) >= 3);
        }
    }

    #[test]
    fn test_index_wraps() {
        assert_eq!(
            insight_for(RiskStatus::Safe, 3, "Audit"),
            insight_for(RiskStatus::Safe, 0, "Audit")
        );
    }
}
