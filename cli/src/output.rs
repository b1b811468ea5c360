//! Plain-text rendering for the terminal.

use covenant_guard_core::{format_currency, Loan, PortfolioStats, TickOutcome};

const NAME_WIDTH: usize = 24;
const COVENANT_WIDTH: usize = 20;

pub fn print_table(loans: &[&Loan]) {
    println!(
        "  {:<name$} {:<cov$} {:>15} {:>6} {:<9} {:>8}",
        "Borrower",
        "Covenant",
        "Actual/Limit",
        "Ratio",
        "Status",
        "Amount",
        name = NAME_WIDTH,
        cov = COVENANT_WIDTH,
    );

    for loan in loans {
        let covenant = loan.primary_covenant();
        let marker = if loan.just_updated() { '*' } else { ' ' };
        println!(
            "{} {:<name$} {:<cov$} {:>15} {:>5.0}% {:<9} {:>8}",
            marker,
            truncate(loan.borrower_name(), NAME_WIDTH),
            truncate(covenant.name(), COVENANT_WIDTH),
            format!("{:.2} / {}", covenant.actual(), covenant.threshold()),
            covenant.ratio_percent(),
            covenant.status(),
            format_currency(loan.amount()),
            name = NAME_WIDTH,
            cov = COVENANT_WIDTH,
        );
        for extra in &loan.covenants()[1..] {
            println!(
                "  {:<name$} {:<cov$} {:>15} {:>5.0}% {:<9}",
                "",
                truncate(extra.name(), COVENANT_WIDTH),
                format!("{:.2} / {}", extra.actual(), extra.threshold()),
                extra.ratio_percent(),
                extra.status(),
                name = NAME_WIDTH,
                cov = COVENANT_WIDTH,
            );
        }
    }
}

pub fn print_stats(stats: &PortfolioStats) {
    let dist = stats.distribution();
    println!();
    println!("Total Exposure: {}", format_currency(stats.total_exposure));
    println!("Critical: {:>3} ({}%)", stats.critical_count, dist.critical_pct);
    println!("Watch:    {:>3} ({}%)", stats.watch_count, dist.watch_pct);
    println!("Safe:     {:>3} ({}%)", stats.safe_count, dist.safe_pct);
}

pub fn print_tick(tick: usize, outcome: &TickOutcome) {
    let transition = if outcome.status_changed() {
        format!(" [{} -> {}]", outcome.previous_status, outcome.new_status())
    } else {
        String::new()
    };
    println!(
        "[{:>4}] > {} {}{}",
        tick, outcome.event.description, outcome.change_message, transition
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
