//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{BlinkOutcome, BlinkStats};

/// Prints per-outcome counts to the log.
pub fn print_outcome_statistics(stats: &BlinkStats) {
    let total = stats.total();
    if total == 0 {
        info!("No blink requests were dispatched");
        return;
    }

    info!("Outcome Counts ({} total):", total);
    for outcome in BlinkOutcome::iter() {
        let count = stats.count(outcome);
        if count > 0 {
            info!("   {}: {}", outcome.as_str(), count);
        }
    }
}

/// Prints a simple one-line summary of the run.
pub fn print_run_summary(requests_sent: u64, accepted: usize, elapsed_seconds: f64) {
    info!(
        "✅ Sent {} blink request{} ({} accepted) in {:.1}s",
        requests_sent,
        if requests_sent == 1 { "" } else { "s" },
        accepted,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_outcome_statistics_empty() {
        print_outcome_statistics(&BlinkStats::new());
    }

    #[test]
    fn test_print_outcome_statistics_all_outcomes() {
        let stats = BlinkStats::new();
        for outcome in BlinkOutcome::iter() {
            stats.record(outcome);
        }
        print_outcome_statistics(&stats);
    }

    #[test]
    fn test_print_run_summary() {
        print_run_summary(0, 0, 0.0);
        print_run_summary(1, 1, 3.0);
        print_run_summary(49, 47, 150.2);
    }
}
