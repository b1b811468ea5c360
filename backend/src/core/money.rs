//! Compact currency formatting for exposure figures.

/// Format an amount as `$7.5M`, `$950.0K` or `$420`.
///
/// # Example
/// ```
/// use covenant_guard_core::format_currency;
///
/// assert_eq!(format_currency(7_500_000.0), "$7.5M");
/// assert_eq!(format_currency(1_200.0), "$1.2K");
/// assert_eq!(format_currency(999.4), "$999");
/// ```
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.1}K", amount / 1_000.0)
    } else {
        format!("${:.0}", amount)
    }
}
