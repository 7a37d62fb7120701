//! Persisted countdown state and derived classifications.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One-shot alert thresholds, in elapsed percent of the prep budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// 60% elapsed: the order is approaching its deadline.
    Approaching,
    /// 80% elapsed: the order is near finish.
    NearFinish,
    /// 100% elapsed (or zero remaining): the order is overdue.
    Overdue,
}

impl Threshold {
    /// The elapsed-percent value at which this threshold fires.
    pub fn percent(&self) -> u8 {
        match self {
            Threshold::Approaching => 60,
            Threshold::NearFinish => 80,
            Threshold::Overdue => 100,
        }
    }
}

/// Severity classification driving the ticket's color and background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    /// At least 60% of the prep budget has elapsed.
    Warning,
    /// At least 80% has elapsed.
    Urgent,
    /// No time remaining.
    Expired,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Urgent => "urgent",
            Severity::Expired => "expired",
        }
    }

    /// Classifies from remaining and total seconds.
    pub fn classify(remaining_seconds: u64, total_seconds: u64) -> Self {
        if total_seconds == 0 || remaining_seconds == 0 {
            return Severity::Expired;
        }
        let elapsed = total_seconds.saturating_sub(remaining_seconds);
        let percent = elapsed * 100 / total_seconds;
        if percent >= 80 {
            Severity::Urgent
        } else if percent >= 60 {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// The per-order record persisted through the timer store.
///
/// Persisting the deadline (rather than a start instant) is what keeps the
/// countdown stable across reloads; persisting the fired set is what keeps
/// each threshold alert one-shot across reloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    /// Epoch milliseconds the countdown ends at. Cleared once expired.
    pub deadline_ms: Option<i64>,
    /// Sticky: once true the timer never resumes counting.
    pub expired: bool,
    /// Thresholds that have already fired for this order.
    pub fired: BTreeSet<Threshold>,
}

impl TimerRecord {
    /// A fresh running record with the given deadline.
    pub fn running(deadline_ms: i64) -> Self {
        Self {
            deadline_ms: Some(deadline_ms),
            expired: false,
            fired: BTreeSet::new(),
        }
    }

    /// Whether the given threshold has already fired.
    pub fn has_fired(&self, threshold: Threshold) -> bool {
        self.fired.contains(&threshold)
    }
}
