//! Tests for portfolio ordering, statistics and search

use chrono::Utc;
use covenant_guard_core::aggregate::{loans_with_status, sort_by_risk_with, summarize_with};
use covenant_guard_core::{
    filter_loans, normalize, sort_by_risk, summarize, Covenant, Loan, RankingBasis, RiskStatus,
};
use proptest::prelude::*;
use serde_json::json;

fn loan(id: &str, amount: f64, actual: f64, threshold: f64) -> Loan {
    Loan::new(
        id,
        format!("Borrower {}", id),
        amount,
        vec![Covenant::new("Leverage", threshold, actual, "")],
        Utc::now(),
    )
}

fn reference_portfolio() -> Vec<Loan> {
    vec![
        loan("C", 3_500_000.0, 1.2, 1.5),
        loan("A", 7_500_000.0, 4.2, 3.5),
        loan("B", 1_200_000.0, 1.8, 2.0),
    ]
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_reference_order() {
    let loans = reference_portfolio();
    let order: Vec<_> = sort_by_risk(&loans).iter().map(|l| l.id()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_sort_does_not_mutate_input() {
    let loans = reference_portfolio();
    let _ = sort_by_risk(&loans);
    let ids: Vec<_> = loans.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
}

#[test]
fn test_equal_status_keeps_input_order() {
    let loans = vec![
        loan("s1", 1.0, 0.1, 2.0),
        loan("c1", 1.0, 3.0, 2.0),
        loan("s2", 1.0, 0.2, 2.0),
        loan("c2", 1.0, 2.5, 2.0),
        loan("s3", 1.0, 0.3, 2.0),
    ];
    let order: Vec<_> = sort_by_risk(&loans).iter().map(|l| l.id()).collect();
    assert_eq!(order, vec!["c1", "c2", "s1", "s2", "s3"]);
}

#[test]
fn test_secondary_covenants_ignored_by_default() {
    let quiet_primary = Loan::new(
        "apex",
        "Apex Global Logistics",
        5_000_000.0,
        vec![
            Covenant::new("Current Ratio", 2.0, 1.0, ""),
            Covenant::new("Debt to Equity", 2.0, 2.45, ""),
        ],
        Utc::now(),
    );
    let watch = loan("watch", 1.0, 1.8, 2.0);
    let loans = vec![quiet_primary, watch];

    let order: Vec<_> = sort_by_risk(&loans).iter().map(|l| l.id()).collect();
    assert_eq!(order, vec!["watch", "apex"]);

    let order: Vec<_> = sort_by_risk_with(&loans, RankingBasis::WorstCovenant)
        .iter()
        .map(|l| l.id())
        .collect();
    assert_eq!(order, vec!["apex", "watch"]);
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_reference_stats() {
    let stats = summarize(&reference_portfolio());

    assert_eq!(stats.total_exposure, 12_200_000.0);
    assert_eq!(stats.critical_count, 1);
    assert_eq!(stats.watch_count, 1);
    assert_eq!(stats.safe_count, 1);
    assert_eq!(stats.count_for(RiskStatus::Critical), 1);
}

#[test]
fn test_empty_stats() {
    let stats = summarize(&[]);
    assert_eq!(stats.total_exposure, 0.0);
    assert_eq!(stats.loan_count(), 0);
    assert!(sort_by_risk(&[]).is_empty());
}

#[test]
fn test_worst_basis_stats() {
    let loans = normalize(&json!([{
        "id": "apex",
        "amount": 5000000,
        "covenants": [
            { "name": "Current Ratio", "threshold": 2.0, "actual": 1.0 },
            { "name": "Debt to Equity", "threshold": 2.0, "actual": 2.45 }
        ]
    }]));

    assert_eq!(summarize(&loans).safe_count, 1);
    assert_eq!(summarize_with(&loans, RankingBasis::WorstCovenant).critical_count, 1);
}

#[test]
fn test_distribution_of_fallback_portfolio() {
    let loans = normalize(&covenant_guard_core::fallback_records());
    let dist = summarize(&loans).distribution();

    // 2 Critical, 1 Watch, 2 Safe out of 5
    assert_eq!(dist.critical_pct, 40);
    assert_eq!(dist.watch_pct, 20);
    assert_eq!(dist.safe_pct, 40);
}

#[test]
fn test_loans_with_status() {
    let loans = reference_portfolio();
    let critical = loans_with_status(&loans, RiskStatus::Critical);
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].id(), "A");
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_filter_by_borrower_and_covenant() {
    let loans = normalize(&covenant_guard_core::fallback_records());

    let hits: Vec<_> = filter_loans(&loans, "techcorp").iter().map(|l| l.id()).collect();
    assert_eq!(hits, vec!["demo-1"]);

    let hits = filter_loans(&loans, "Interest Coverage");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].borrower_name(), "Apex Global Logistics");

    assert_eq!(filter_loans(&loans, "").len(), loans.len());
    assert!(filter_loans(&loans, "no such borrower").is_empty());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_sort_is_stable_priority_order(
        ratios in prop::collection::vec((0.0f64..5.0, 0.1f64..4.0), 0..40)
    ) {
        let loans: Vec<Loan> = ratios
            .iter()
            .enumerate()
            .map(|(i, (actual, threshold))| loan(&i.to_string(), 1.0, *actual, *threshold))
            .collect();

        let sorted = sort_by_risk(&loans);
        prop_assert_eq!(sorted.len(), loans.len());

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (pa, pb) = (a.primary_status().priority(), b.primary_status().priority());
            prop_assert!(pa >= pb);
            if pa == pb {
                let ia: usize = a.id().parse().unwrap();
                let ib: usize = b.id().parse().unwrap();
                prop_assert!(ia < ib);
            }
        }
    }

    #[test]
    fn prop_counts_partition_portfolio(
        entries in prop::collection::vec((0.0f64..1e7, 0.0f64..5.0, 0.1f64..4.0), 0..40)
    ) {
        let loans: Vec<Loan> = entries
            .iter()
            .enumerate()
            .map(|(i, (amount, actual, threshold))| loan(&i.to_string(), *amount, *actual, *threshold))
            .collect();

        let stats = summarize(&loans);
        prop_assert_eq!(stats.loan_count(), loans.len());

        let expected: f64 = loans.iter().map(|l| l.amount()).sum();
        prop_assert!((stats.total_exposure - expected).abs() < 1e-6);
    }
}
