//! Dispatch outcome statistics.
//!
//! This module provides thread-safe counters for the outcome of every
//! dispatch cycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::BlinkOutcome;

/// Thread-safe per-outcome counters.
///
/// Every `BlinkOutcome` variant is initialized to zero on creation, so lookups
/// never miss. Shared between the dispatcher and the shutdown/progress
/// reporting via `Arc`.
pub struct BlinkStats {
    outcomes: HashMap<BlinkOutcome, AtomicUsize>,
}

impl Default for BlinkStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in BlinkOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        BlinkStats { outcomes }
    }

    /// Increment the counter for an outcome.
    pub fn record(&self, outcome: BlinkOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record outcome {:?} which is not in the map. \
                 This indicates a bug in BlinkStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome.
    pub fn count(&self, outcome: BlinkOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of dispatch cycles recorded.
    pub fn total(&self) -> usize {
        BlinkOutcome::iter().map(|o| self.count(o)).sum()
    }

    /// Number of cycles whose request reached the server.
    pub fn total_sent(&self) -> usize {
        BlinkOutcome::iter()
            .filter(BlinkOutcome::was_sent)
            .map(|o| self.count(o))
            .sum()
    }

    /// Number of cycles that did not end in `Accepted`.
    pub fn total_errors(&self) -> usize {
        BlinkOutcome::iter()
            .filter(BlinkOutcome::is_error)
            .map(|o| self.count(o))
            .sum()
    }
}
