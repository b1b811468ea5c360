//! Built-in demo portfolio used when no upstream data is available.

use serde_json::{json, Value};

/// Raw demo records, in the same shape the upstream API serves.
///
/// The stored statuses are deliberately stale for some entries; they are
/// recomputed by [`normalize`](super::normalize) like any other input.
pub fn fallback_records() -> Value {
    json!([
        {
            "id": "demo-1",
            "borrower_name": "TechCorp Inc.",
            "amount": 7_500_000.0,
            "covenants": [{
                "name": "Debt/EBITDA",
                "threshold": 3.5,
                "actual": 4.2,
                "status": "Critical",
                "insight": "Exceeds covenant limit after revenue decline."
            }]
        },
        {
            "id": "demo-2",
            "borrower_name": "GreenLeaf Energy",
            "amount": 1_200_000.0,
            "covenants": [{
                "name": "Leverage Ratio",
                "threshold": 2.0,
                "actual": 1.8,
                "status": "Watch",
                "insight": "Operating income dropped, coverage is thin."
            }]
        },
        {
            "id": "demo-3",
            "borrower_name": "MediCare Systems",
            "amount": 3_500_000.0,
            "covenants": [{
                "name": "Debt to Equity",
                "threshold": 1.5,
                "actual": 1.2,
                "status": "Safe",
                "insight": "Liquidity position is strong."
            }]
        },
        {
            "id": "demo-4",
            "borrower_name": "Apex Global Logistics",
            "amount": 5_000_000.0,
            "covenants": [{
                "name": "Debt to Equity",
                "threshold": 2.0,
                "actual": 2.45,
                "status": "Critical",
                "insight": "Debt spiked by 20% post-merger."
            }, {
                "name": "Interest Coverage",
                "threshold": 3.0,
                "actual": 1.9,
                "insight": "Coverage holding steady."
            }]
        },
        {
            "id": "demo-5",
            "borrower_name": "Harbor Retail Group",
            "amount": 2_800_000.0,
            "covenants": [{
                "name": "Net Leverage",
                "threshold": 4.0,
                "actual": 2.1,
                "status": "Watch",
                "insight": "Seasonal inventory build within plan."
            }]
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskStatus;
    use crate::normalize::normalize;

    #[test]
    fn test_fallback_statuses_are_recomputed() {
        let loans = normalize(&fallback_records());
        let statuses: Vec<_> = loans.iter().map(|l| l.primary_status()).collect();

        assert_eq!(
            statuses,
            vec![
                RiskStatus::Critical,
                RiskStatus::Watch,
                RiskStatus::Safe,
                RiskStatus::Critical,
                // Stored as "Watch" upstream; 2.1 <= 3.2 is Safe
                RiskStatus::Safe,
            ]
        );
    }

    #[test]
    fn test_fallback_ids_unique() {
        let loans = normalize(&fallback_records());
        let mut ids: Vec<_> = loans.iter().map(|l| l.id().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), loans.len());
    }
}
