//! Progress logging utilities.

use log::info;
use std::time::Instant;

use crate::error_handling::BlinkStats;

/// Logs how many flash requests have been sent and at what rate.
///
/// # Arguments
///
/// * `start_time` - When the dispatch loop started
/// * `request_count` - Requests that reached the server so far
/// * `stats` - Outcome counters (for the error tally)
pub fn log_progress(start_time: Instant, request_count: u64, stats: &BlinkStats) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let per_minute = if elapsed_secs > 0.0 {
        request_count as f64 * 60.0 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Sent {} blink requests in {:.0} seconds (~{:.1} requests/min, {} not accepted)",
        request_count,
        elapsed_secs,
        per_minute,
        stats.total_errors()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_at_start() {
        // Zero elapsed time must not divide by zero
        log_progress(Instant::now(), 0, &BlinkStats::new());
    }

    #[test]
    fn test_log_progress_with_requests() {
        let stats = BlinkStats::new();
        stats.record(crate::error_handling::BlinkOutcome::RateLimited);
        log_progress(Instant::now(), 42, &stats);
    }
}
