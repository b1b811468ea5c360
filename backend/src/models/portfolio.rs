//! Portfolio state container
//!
//! Owns the ordered loan collection. Insertion order is preserved; any
//! risk ordering is a view computed by [`crate::aggregate`].

use crate::models::loan::Loan;

/// The loans currently under monitoring.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use covenant_guard_core::{Loan, Portfolio};
///
/// let portfolio = Portfolio::from_loans(vec![
///     Loan::new("L1", "TechCorp Inc.", 7_500_000.0, Vec::new(), Utc::now()),
/// ]);
/// assert_eq!(portfolio.len(), 1);
/// assert!(portfolio.get("L1").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    loans: Vec<Loan>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_loans(loans: Vec<Loan>) -> Self {
        Self { loans }
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id() == id)
    }

    pub(crate) fn get_mut_at(&mut self, index: usize) -> Option<&mut Loan> {
        self.loans.get_mut(index)
    }

    /// Replace the whole collection (a fresh load).
    pub fn replace(&mut self, loans: Vec<Loan>) {
        self.loans = loans;
    }

    pub fn clear_update_flags(&mut self) {
        for loan in &mut self.loans {
            loan.clear_update_flag();
        }
    }

    pub fn into_loans(self) -> Vec<Loan> {
        self.loans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn loan(id: &str) -> Loan {
        Loan::new(id, format!("Borrower {id}"), 1_000.0, Vec::new(), Utc::now())
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut portfolio = Portfolio::from_loans(vec![loan("A"), loan("B")]);
        portfolio.replace(vec![loan("C")]);

        assert_eq!(portfolio.len(), 1);
        assert!(portfolio.get("A").is_none());
        assert!(portfolio.get("C").is_some());
    }

    #[test]
    fn test_clear_update_flags() {
        let mut portfolio = Portfolio::from_loans(vec![loan("A"), loan("B")]);
        portfolio.get_mut_at(1).unwrap().mark_updated();

        portfolio.clear_update_flags();
        assert!(portfolio.loans().iter().all(|l| !l.just_updated()));
    }
}
