//! Blink dispatching.
//!
//! The dispatcher is the long-running loop of the application: it paces flash
//! requests through the rate limiter, keeps the CSRF token fresh, cycles the
//! colors and triggers telemetry reports.

mod dispatcher;
mod settings;

pub use dispatcher::Dispatcher;
pub use settings::DispatchSettings;
