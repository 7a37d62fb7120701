//! Per-order preparation countdowns.
//!
//! The engine computes a deadline the first time an order is observed,
//! persists it through the injected timer store so a restart does not reset
//! in-progress countdowns, and derives remaining time, elapsed percentage,
//! severity, and one-shot alert thresholds on every tick.

mod engine;
mod format;
mod state;

pub use engine::{CountdownEngine, CountdownInputs, CountdownStatus, TickOutcome};
pub use format::format_remaining;
pub use state::{Severity, Threshold, TimerRecord};
