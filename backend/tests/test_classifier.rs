//! Tests for covenant classification
//!
//! Status is a pure function of (actual, threshold):
//! Critical above the threshold, Watch above 80% of it, Safe otherwise.

use covenant_guard_core::{classify, Covenant, RiskStatus};
use proptest::prelude::*;

#[test]
fn test_reference_scenario() {
    // A: 4.2 > 3.5
    assert_eq!(classify(4.2, 3.5), RiskStatus::Critical);
    // B: 1.6 < 1.8 <= 2.0
    assert_eq!(classify(1.8, 2.0), RiskStatus::Watch);
    // C: 1.2 <= 1.5 * 0.8
    assert_eq!(classify(1.2, 1.5), RiskStatus::Safe);
}

#[test]
fn test_threshold_itself_is_watch() {
    assert_eq!(classify(3.5, 3.5), RiskStatus::Watch);
}

#[test]
fn test_zero_threshold_has_no_watch_band() {
    assert_eq!(classify(0.0, 0.0), RiskStatus::Safe);
    assert_eq!(classify(1e-9, 0.0), RiskStatus::Critical);
}

#[test]
fn test_classify_is_deterministic() {
    for _ in 0..10 {
        assert_eq!(classify(1.7, 2.0), RiskStatus::Watch);
    }
}

#[test]
fn test_covenant_status_follows_setters() {
    let mut covenant = Covenant::new("Interest Coverage", 3.0, 1.0, "Stable");
    assert_eq!(covenant.status(), RiskStatus::Safe);

    covenant.set_actual(3.1);
    assert_eq!(covenant.status(), RiskStatus::Critical);

    covenant.set_threshold(4.0);
    assert_eq!(covenant.status(), RiskStatus::Safe);
}

#[test]
fn test_status_serializes_by_name() {
    let covenant = Covenant::new("Debt/EBITDA", 3.5, 4.2, "Exceeds covenant");
    let json = serde_json::to_value(&covenant).unwrap();
    assert_eq!(json["status"], "Critical");
}

proptest! {
    #[test]
    fn prop_classify_monotonic_in_actual(
        threshold in 0.001f64..100.0,
        a in 0.0f64..200.0,
        b in 0.0f64..200.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo, threshold) <= classify(hi, threshold));
    }

    #[test]
    fn prop_classify_matches_band_rule(
        threshold in 0.001f64..100.0,
        actual in 0.0f64..200.0,
    ) {
        let expected = if actual > threshold {
            RiskStatus::Critical
        } else if actual > threshold * 0.8 {
            RiskStatus::Watch
        } else {
            RiskStatus::Safe
        };
        prop_assert_eq!(classify(actual, threshold), expected);
    }
}
