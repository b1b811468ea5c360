//! Query Responder
//!
//! Maps a free-text query plus the current portfolio to a canned answer.
//! Matching is case-insensitive substring matching against a fixed, ordered
//! rule list; the first matching rule wins:
//!
//! | # | Rule              | Keywords                          |
//! |---|-------------------|-----------------------------------|
//! | 1 | Greeting          | `hello`, `hi`, `hey`              |
//! | 2 | Help              | `help`                            |
//! | 3 | Critical listing  | `critical`, `risk`                |
//! | 4 | Watch listing     | `watch`                           |
//! | 5 | Simulation status | `simulation`, `auto`, `running`   |
//! | 6 | Total exposure    | `total`, `exposure`               |
//! | 7 | Portfolio health  | `status`, `health`                |
//! | 8 | Borrower lookup   | borrower name ⊂ query, or query ⊂ name |
//! | 9 | Fallback          | (anything else)                   |
//!
//! Every answer is computed from the loans passed to this call.

use crate::aggregate::{loans_with_status, summarize};
use crate::core::format_currency;
use crate::models::{Loan, RiskStatus};

/// A responder rule, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRule {
    Greeting,
    Help,
    CriticalListing,
    WatchListing,
    SimulationStatus,
    TotalExposure,
    PortfolioHealth,
    BorrowerLookup,
    Fallback,
}

impl QueryRule {
    /// Keyword rules in evaluation order. Borrower lookup and fallback are
    /// not keyword driven.
    const KEYWORD_RULES: [(QueryRule, &'static [&'static str]); 7] = [
        (QueryRule::Greeting, &["hello", "hi", "hey"]),
        (QueryRule::Help, &["help"]),
        (QueryRule::CriticalListing, &["critical", "risk"]),
        (QueryRule::WatchListing, &["watch"]),
        (QueryRule::SimulationStatus, &["simulation", "auto", "running"]),
        (QueryRule::TotalExposure, &["total", "exposure"]),
        (QueryRule::PortfolioHealth, &["status", "health"]),
    ];
}

pub const GREETING: &str = "Hello! I can help analyze loan risks and covenant breaches.";

pub const HELP: &str = "I can help with:\n\
- Loan status checks\n\
- Risk analysis\n\
- Portfolio totals\n\
- Simulation control\n\
\n\
Try: \"Show critical loans\" or \"What is our total exposure?\"";

pub const NO_CRITICAL: &str = "No critical risks detected.";

pub const NO_WATCH: &str = "No loans on watch list.";

pub const SIMULATION_ACTIVE: &str = "Simulation Active: Real-time market events running.";

pub const SIMULATION_PAUSED: &str = "Simulation Paused: Start auto play to resume market events.";

pub const FALLBACK: &str = "I'm not sure I understand. Try asking about:\n\
- Loan status\n\
- Portfolio risks\n\
- Total exposure\n\
- Simulation status";

/// Which rule a query resolves to, and the matched loan for lookups.
pub fn match_rule<'a>(query: &str, loans: &'a [Loan]) -> (QueryRule, Option<&'a Loan>) {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return (QueryRule::Fallback, None);
    }

    for (rule, keywords) in QueryRule::KEYWORD_RULES {
        if keywords.iter().any(|keyword| query.contains(keyword)) {
            return (rule, None);
        }
    }

    match find_borrower(&query, loans) {
        Some(loan) => (QueryRule::BorrowerLookup, Some(loan)),
        None => (QueryRule::Fallback, None),
    }
}

/// Answer a query from the current portfolio state.
///
/// # Example
/// ```
/// use covenant_guard_core::{normalize, respond};
/// use serde_json::json;
///
/// let loans = normalize(&json!([
///     { "borrower_name": "TechCorp Inc.", "amount": 7500000,
///       "covenants": [{ "name": "Debt/EBITDA", "threshold": 3.5, "actual": 4.2 }] }
/// ]));
///
/// assert_eq!(respond("Show critical loans", &loans, false), "1 Critical Loans: TechCorp Inc.");
/// assert_eq!(respond("total exposure?", &loans, false), "Total Exposure: $7.5M");
/// ```
pub fn respond(query: &str, loans: &[Loan], simulation_active: bool) -> String {
    let (rule, matched) = match_rule(query, loans);

    match rule {
        QueryRule::Greeting => GREETING.to_string(),
        QueryRule::Help => HELP.to_string(),
        QueryRule::CriticalListing => {
            let critical = loans_with_status(loans, RiskStatus::Critical);
            if critical.is_empty() {
                NO_CRITICAL.to_string()
            } else {
                format!("{} Critical Loans: {}", critical.len(), join_names(&critical))
            }
        }
        QueryRule::WatchListing => {
            let watch = loans_with_status(loans, RiskStatus::Watch);
            if watch.is_empty() {
                NO_WATCH.to_string()
            } else {
                format!("Watch List ({}): {}", watch.len(), join_names(&watch))
            }
        }
        QueryRule::SimulationStatus => {
            if simulation_active {
                SIMULATION_ACTIVE.to_string()
            } else {
                SIMULATION_PAUSED.to_string()
            }
        }
        QueryRule::TotalExposure => {
            format!("Total Exposure: {}", format_currency(summarize(loans).total_exposure))
        }
        QueryRule::PortfolioHealth => {
            let stats = summarize(loans);
            format!(
                "Portfolio Health:\n\
                 - Total Loans: {}\n\
                 - Critical: {}\n\
                 - Watch: {}\n\
                 - Safe: {}\n\
                 - Total Exposure: {}",
                loans.len(),
                stats.critical_count,
                stats.watch_count,
                stats.safe_count,
                format_currency(stats.total_exposure)
            )
        }
        QueryRule::BorrowerLookup => match matched {
            Some(loan) => describe_loan(loan),
            None => FALLBACK.to_string(),
        },
        QueryRule::Fallback => FALLBACK.to_string(),
    }
}

fn find_borrower<'a>(query: &str, loans: &'a [Loan]) -> Option<&'a Loan> {
    loans.iter().find(|loan| {
        let name = loan.borrower_name().trim().to_lowercase();
        !name.is_empty() && (query.contains(&name) || name.contains(query))
    })
}

fn describe_loan(loan: &Loan) -> String {
    let covenant = loan.primary_covenant();
    format!(
        "{}\nAmount: {}\nStatus: {}\nRatio: {:.2} / {}\nInsight: {}",
        loan.borrower_name(),
        format_currency(loan.amount()),
        covenant.status(),
        covenant.actual(),
        covenant.threshold(),
        covenant.insight()
    )
}

fn join_names(loans: &[&Loan]) -> String {
    loans
        .iter()
        .map(|loan| loan.borrower_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Covenant;
    use chrono::Utc;

    fn loan(name: &str, actual: f64, threshold: f64) -> Loan {
        Loan::new(
            name,
            name,
            1_000_000.0,
            vec![Covenant::new("Leverage", threshold, actual, "Stable")],
            Utc::now(),
        )
    }

    #[test]
    fn test_rule_order_greeting_beats_critical() {
        let loans = vec![loan("Apex", 3.0, 2.0)];
        assert_eq!(match_rule("hello, any critical loans?", &loans).0, QueryRule::Greeting);
    }

    #[test]
    fn test_rule_order_critical_beats_watch() {
        let loans = vec![loan("Apex", 3.0, 2.0)];
        assert_eq!(
            match_rule("critical or watch", &loans).0,
            QueryRule::CriticalListing
        );
    }

    #[test]
    fn test_blank_query_is_fallback() {
        assert_eq!(respond("   ", &[], false), FALLBACK);
    }

    #[test]
    fn test_lookup_both_directions() {
        let loans = vec![loan("GreenLeaf Energy", 1.8, 2.0)];
        assert_eq!(
            match_rule("tell me about greenleaf energy please", &loans).0,
            QueryRule::BorrowerLookup
        );
        assert_eq!(match_rule("greenleaf", &loans).0, QueryRule::BorrowerLookup);
        assert_eq!(match_rule("zebra", &loans).0, QueryRule::Fallback);
    }

    #[test]
    fn test_describe_loan_format() {
        let loans = vec![loan("GreenLeaf Energy", 1.8, 2.0)];
        assert_eq!(
            respond("greenleaf", &loans, false),
            "GreenLeaf Energy\nAmount: $1.0M\nStatus: Watch\nRatio: 1.80 / 2\nInsight: Stable"
        );
    }
}
