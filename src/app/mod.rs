//! Main application modules.
//!
//! This module provides utilities for endpoint validation, progress logging,
//! shutdown handling, and statistics printing used by the main application.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

// Re-export public API
pub use logging::log_progress;
pub use shutdown::{shutdown_gracefully, spawn_interrupt_listener};
pub use statistics::{print_outcome_statistics, print_run_summary};
pub use url::normalize_base_url;
