//! Time source abstraction.
//!
//! Countdown arithmetic and the mute window both depend on "now"; injecting
//! the clock keeps those paths deterministic under test.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
