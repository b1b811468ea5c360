//! Loan Normalizer
//!
//! Turns untrusted upstream records (the REST payload shape
//! `[{id?, borrower_name?, amount, covenants: [{name, threshold, actual, status?, insight?}]}]`)
//! into canonical [`Loan`] values.
//!
//! Malformed input is never an error: every missing or non-numeric leaf is
//! replaced by a documented default, and any upstream `status` is discarded
//! in favor of [`classify`](crate::classify).

mod fallback;

pub use fallback::fallback_records;

use crate::models::{Covenant, Loan};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

pub const UNKNOWN_BORROWER: &str = "Unknown Borrower";
pub const UNNAMED_COVENANT: &str = "Unnamed Covenant";
pub const NO_INSIGHT: &str = "No insight available";
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Normalize raw records, stamping them with the current time.
///
/// # Example
/// ```
/// use covenant_guard_core::{normalize, RiskStatus};
/// use serde_json::json;
///
/// let loans = normalize(&json!([{ "borrower_name": "GreenLeaf Energy", "amount": "1200000",
///     "covenants": [{ "name": "Leverage", "threshold": 2.0, "actual": 1.8, "status": "Safe" }] }]));
///
/// assert_eq!(loans.len(), 1);
/// assert_eq!(loans[0].amount(), 1_200_000.0);
/// assert_eq!(loans[0].primary_status(), RiskStatus::Watch);
/// ```
pub fn normalize(raw: &Value) -> Vec<Loan> {
    normalize_at(raw, Utc::now())
}

/// Normalize raw records with an explicit timestamp.
///
/// Non-array input yields an empty list. Output order equals input order.
pub fn normalize_at(raw: &Value, now: DateTime<Utc>) -> Vec<Loan> {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            warn!(kind = value_kind(raw), "loan payload is not an array; ignoring it");
        }
        return Vec::new();
    };

    let empty = Map::new();
    let loans: Vec<Loan> = entries
        .iter()
        .map(|entry| normalize_loan(entry.as_object().unwrap_or(&empty), now))
        .collect();

    debug!(count = loans.len(), "normalized loan records");
    loans
}

fn normalize_loan(record: &Map<String, Value>, now: DateTime<Utc>) -> Loan {
    let id = extract_id(record).unwrap_or_else(generate_loan_id);
    let borrower_name = extract_text(record, "borrower_name").unwrap_or(UNKNOWN_BORROWER);
    let amount = extract_number(record, "amount")
        .filter(|amount| *amount >= 0.0)
        .unwrap_or(0.0);

    let covenants = record
        .get("covenants")
        .and_then(Value::as_array)
        .map(|items| {
            let empty = Map::new();
            items
                .iter()
                .map(|item| normalize_covenant(item.as_object().unwrap_or(&empty)))
                .collect()
        })
        .unwrap_or_default();

    // Loan::new fills an empty covenant list with the synthetic default
    Loan::new(id, borrower_name, amount, covenants, now)
}

fn normalize_covenant(record: &Map<String, Value>) -> Covenant {
    let name = extract_text(record, "name").unwrap_or(UNNAMED_COVENANT);
    let threshold = extract_number(record, "threshold")
        .filter(|threshold| *threshold > 0.0)
        .unwrap_or(DEFAULT_THRESHOLD);
    let actual = extract_number(record, "actual")
        .or_else(|| extract_number(record, "actual_value"))
        .filter(|actual| *actual >= 0.0)
        .unwrap_or(0.0);
    let insight = extract_text(record, "insight")
        .or_else(|| extract_text(record, "explanation"))
        .unwrap_or(NO_INSIGHT);

    Covenant::new(name, threshold, actual, insight)
}

// ========================================================================
// Field Extraction Helpers
// ========================================================================

/// Extract a non-empty string field.
///
/// Returns `None` when the field is missing, not a string, or blank.
fn extract_text<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Extract a finite number from a numeric or numeric-string field.
///
/// Strings are parsed leniently: the longest leading numeric prefix counts,
/// so `"1200000.50 USD"` reads as `1200000.5`.
fn extract_number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match record.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_leading_float(text),
        _ => None,
    };
    value.filter(|value| value.is_finite())
}

/// Extract an id: non-empty strings are kept, numbers are rendered.
///
/// Integral floats drop their fraction, so `3.0` and `3` give the same id.
fn extract_id(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(int.to_string())
            } else if let Some(uint) = number.as_u64() {
                Some(uint.to_string())
            } else {
                number.as_f64().map(|float| float.to_string())
            }
        }
        _ => None,
    }
}

fn generate_loan_id() -> String {
    format!("loan-{}", Uuid::new_v4().simple())
}

/// Parse the longest numeric prefix of `text` (after leading whitespace).
fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                end = i + 1;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if i + 1 < bytes.len() && (bytes[i + 1] == b'+' || bytes[i + 1] == b'-') {
                    i += 1;
                }
            }
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end].parse::<f64>().ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
