//! Loan model
//!
//! A loan carries one or more covenants. The first covenant is the *primary*
//! covenant: ranking, counting and simulation all key off it.
//!
//! # Critical Invariants
//!
//! 1. `covenants` is never empty (a synthetic Safe covenant fills the gap)
//! 2. `original_amount` is captured once at construction and never rewritten
//! 3. `amount` is never negative

use crate::models::covenant::{Covenant, RiskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A loan in the monitored portfolio.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use covenant_guard_core::{Covenant, Loan, RiskStatus};
///
/// let loan = Loan::new(
///     "demo-1",
///     "TechCorp Inc.",
///     7_500_000.0,
///     vec![Covenant::new("Debt/EBITDA", 3.5, 4.2, "Exceeds covenant")],
///     Utc::now(),
/// );
/// assert_eq!(loan.primary_status(), RiskStatus::Critical);
/// assert_eq!(loan.original_amount(), 7_500_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LoanRecord")]
pub struct Loan {
    id: String,
    borrower_name: String,
    amount: f64,
    original_amount: f64,
    covenants: Vec<Covenant>,
    last_updated: DateTime<Utc>,
    just_updated: bool,
}

#[derive(Deserialize)]
struct LoanRecord {
    id: String,
    borrower_name: String,
    amount: f64,
    original_amount: Option<f64>,
    #[serde(default)]
    covenants: Vec<Covenant>,
    last_updated: DateTime<Utc>,
    #[serde(default)]
    just_updated: bool,
}

impl From<LoanRecord> for Loan {
    fn from(record: LoanRecord) -> Self {
        let mut loan = Loan::new(
            record.id,
            record.borrower_name,
            record.amount,
            record.covenants,
            record.last_updated,
        );
        if let Some(original) = record.original_amount {
            loan.original_amount = non_negative(original);
        }
        loan.just_updated = record.just_updated;
        loan
    }
}

impl Loan {
    /// Create a loan. `original_amount` is set to `amount`; an empty
    /// covenant list is replaced by [`Covenant::default_synthetic`].
    pub fn new(
        id: impl Into<String>,
        borrower_name: impl Into<String>,
        amount: f64,
        covenants: Vec<Covenant>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let amount = non_negative(amount);
        let covenants = if covenants.is_empty() {
            vec![Covenant::default_synthetic()]
        } else {
            covenants
        };

        Self {
            id: id.into(),
            borrower_name: borrower_name.into(),
            amount,
            original_amount: amount,
            covenants,
            last_updated,
            just_updated: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn borrower_name(&self) -> &str {
        &self.borrower_name
    }

    /// Current outstanding amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Baseline amount captured at load time.
    pub fn original_amount(&self) -> f64 {
        self.original_amount
    }

    pub fn covenants(&self) -> &[Covenant] {
        &self.covenants
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn just_updated(&self) -> bool {
        self.just_updated
    }

    /// The covenant used for ranking and simulation.
    pub fn primary_covenant(&self) -> &Covenant {
        &self.covenants[0]
    }

    pub fn primary_covenant_mut(&mut self) -> &mut Covenant {
        &mut self.covenants[0]
    }

    pub fn primary_status(&self) -> RiskStatus {
        self.primary_covenant().status()
    }

    /// Worst status across every covenant on the loan.
    pub fn worst_status(&self) -> RiskStatus {
        self.covenants
            .iter()
            .map(Covenant::status)
            .max()
            .unwrap_or(RiskStatus::Safe)
    }

    /// Set the current amount, clamped to `>= 0`.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = non_negative(amount);
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }

    pub fn mark_updated(&mut self) {
        self.just_updated = true;
    }

    /// Cleared by the presentation path after one display cycle.
    pub fn clear_update_flag(&mut self) {
        self.just_updated = false;
    }

    /// Case-insensitive match against borrower name and covenant names/insights.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.borrower_name.to_lowercase().contains(&needle)
            || self.covenants.iter().any(|covenant| {
                covenant.name().to_lowercase().contains(&needle)
                    || covenant.insight().to_lowercase().contains(&needle)
            })
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan_with(covenants: Vec<Covenant>) -> Loan {
        Loan::new("L1", "Apex Global Logistics", 5_000_000.0, covenants, Utc::now())
    }

    #[test]
    fn test_empty_covenants_get_default() {
        let loan = loan_with(Vec::new());
        assert_eq!(loan.covenants().len(), 1);
        assert_eq!(loan.primary_covenant().name(), "Default Covenant");
        assert_eq!(loan.primary_status(), RiskStatus::Safe);
    }

    #[test]
    fn test_amount_clamped_and_original_fixed() {
        let mut loan = loan_with(vec![Covenant::new("D/E", 2.0, 1.0, "")]);
        loan.set_amount(-10.0);
        assert_eq!(loan.amount(), 0.0);
        assert_eq!(loan.original_amount(), 5_000_000.0);

        loan.set_amount(f64::INFINITY);
        assert_eq!(loan.amount(), 0.0);
    }

    #[test]
    fn test_worst_status_looks_past_primary() {
        let loan = loan_with(vec![
            Covenant::new("Current Ratio", 2.0, 1.0, ""),
            Covenant::new("Debt to Equity", 2.0, 2.45, ""),
        ]);
        assert_eq!(loan.primary_status(), RiskStatus::Safe);
        assert_eq!(loan.worst_status(), RiskStatus::Critical);
    }

    #[test]
    fn test_matches_search() {
        let loan = loan_with(vec![Covenant::new(
            "Debt to Equity",
            2.0,
            2.45,
            "Debt spiked post-merger",
        )]);
        assert!(loan.matches_search("apex"));
        assert!(loan.matches_search("EQUITY"));
        assert!(loan.matches_search("merger"));
        assert!(loan.matches_search("   "));
        assert!(!loan.matches_search("greenleaf"));
    }

    #[test]
    fn test_json_preserves_float_bits() {
        let mut loan = loan_with(vec![Covenant::new("D/E", 2.0, 1.734_925_118_066_292_7, "")]);
        loan.set_amount(912_363.477_552_131_9);

        let json = serde_json::to_string(&loan).unwrap();
        let restored: Loan = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.amount().to_bits(), loan.amount().to_bits());
        assert_eq!(
            restored.primary_covenant().actual().to_bits(),
            loan.primary_covenant().actual().to_bits()
        );
    }

    #[test]
    fn test_deserialize_keeps_original_amount() {
        let mut loan = loan_with(vec![Covenant::new("D/E", 2.0, 1.0, "")]);
        loan.set_amount(5_400_000.0);
        loan.mark_updated();

        let json = serde_json::to_string(&loan).unwrap();
        let restored: Loan = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, loan);
        assert_eq!(restored.original_amount(), 5_000_000.0);
        assert!(restored.just_updated());
    }
}
