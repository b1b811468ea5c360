//! Portfolio Aggregator
//!
//! Risk-ordered views and summary statistics over a loan collection.
//!
//! # Ranking basis
//!
//! By default only each loan's *primary* (first) covenant is considered for
//! ordering and counting; secondary covenants are display-only. The
//! [`RankingBasis::WorstCovenant`] variant ranks by the worst status across
//! all covenants instead and is opt-in.

use crate::models::{Loan, RiskStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Which covenant status drives ranking and counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingBasis {
    /// Status of `covenants[0]`
    #[default]
    PrimaryCovenant,
    /// Worst status across all covenants
    WorstCovenant,
}

impl RankingBasis {
    pub fn status_of(self, loan: &Loan) -> RiskStatus {
        match self {
            RankingBasis::PrimaryCovenant => loan.primary_status(),
            RankingBasis::WorstCovenant => loan.worst_status(),
        }
    }
}

/// Summary statistics for a set of loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Sum of current `amount` over all loans
    pub total_exposure: f64,
    pub critical_count: usize,
    pub watch_count: usize,
    pub safe_count: usize,
}

impl PortfolioStats {
    /// Number of loans counted (the three counts always partition the input).
    pub fn loan_count(&self) -> usize {
        self.critical_count + self.watch_count + self.safe_count
    }

    pub fn count_for(&self, status: RiskStatus) -> usize {
        match status {
            RiskStatus::Critical => self.critical_count,
            RiskStatus::Watch => self.watch_count,
            RiskStatus::Safe => self.safe_count,
        }
    }

    /// Rounded share of each tier, in percent.
    pub fn distribution(&self) -> StatusDistribution {
        let total = self.loan_count().max(1) as f64;
        let pct = |count: usize| ((count as f64 / total) * 100.0).round() as u32;

        StatusDistribution {
            critical_pct: pct(self.critical_count),
            watch_pct: pct(self.watch_count),
            safe_pct: pct(self.safe_count),
        }
    }
}

/// Percent of loans in each tier (for bar charts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub critical_pct: u32,
    pub watch_pct: u32,
    pub safe_pct: u32,
}

/// Loans ordered Critical → Watch → Safe by primary covenant.
///
/// The sort is stable: loans with equal status keep their input order.
///
/// # Example
/// ```
/// use covenant_guard_core::{normalize, sort_by_risk};
/// use serde_json::json;
///
/// let loans = normalize(&json!([
///     { "id": "C", "covenants": [{ "actual": 1.2, "threshold": 1.5 }] },
///     { "id": "A", "covenants": [{ "actual": 4.2, "threshold": 3.5 }] },
///     { "id": "B", "covenants": [{ "actual": 1.8, "threshold": 2.0 }] },
/// ]));
///
/// let order: Vec<_> = sort_by_risk(&loans).iter().map(|l| l.id()).collect();
/// assert_eq!(order, vec!["A", "B", "C"]);
/// ```
pub fn sort_by_risk(loans: &[Loan]) -> Vec<&Loan> {
    sort_by_risk_with(loans, RankingBasis::PrimaryCovenant)
}

pub fn sort_by_risk_with(loans: &[Loan], basis: RankingBasis) -> Vec<&Loan> {
    let mut sorted: Vec<&Loan> = loans.iter().collect();
    // slice::sort_by_key is stable
    sorted.sort_by_key(|loan| Reverse(basis.status_of(loan).priority()));
    sorted
}

/// Exposure and status counts by primary covenant.
///
/// An empty input yields all zeros.
pub fn summarize(loans: &[Loan]) -> PortfolioStats {
    summarize_with(loans, RankingBasis::PrimaryCovenant)
}

pub fn summarize_with(loans: &[Loan], basis: RankingBasis) -> PortfolioStats {
    loans
        .iter()
        .fold(PortfolioStats::default(), |mut stats, loan| {
            stats.total_exposure += loan.amount();
            match basis.status_of(loan) {
                RiskStatus::Critical => stats.critical_count += 1,
                RiskStatus::Watch => stats.watch_count += 1,
                RiskStatus::Safe => stats.safe_count += 1,
            }
            stats
        })
}

/// Loans with the given primary status, in input order.
pub fn loans_with_status(loans: &[Loan], status: RiskStatus) -> Vec<&Loan> {
    loans
        .iter()
        .filter(|loan| loan.primary_status() == status)
        .collect()
}

/// Search filter over borrower names, covenant names and insights.
///
/// A blank term returns every loan.
pub fn filter_loans<'a>(loans: &'a [Loan], term: &str) -> Vec<&'a Loan> {
    loans.iter().filter(|loan| loan.matches_search(term)).collect()
}
