//! Poll-to-poll order set diffing.

use std::collections::BTreeSet;

use crate::domain::foundation::OrderNumber;

/// What changed between two consecutive polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardDelta {
    /// Orders present now that were absent last poll.
    pub newly_arrived: Vec<OrderNumber>,
    /// Orders absent now that were present last poll (finished or cancelled
    /// from another terminal).
    pub removed: Vec<OrderNumber>,
}

impl BoardDelta {
    pub fn is_empty(&self) -> bool {
        self.newly_arrived.is_empty() && self.removed.is_empty()
    }
}

/// Diffs the current order set against the previous one.
///
/// The very first poll after startup reports no arrivals: orders that were
/// already on the board when the display came up are not "new" and must not
/// trigger an alert.
pub fn reconcile(
    previous: Option<&BTreeSet<OrderNumber>>,
    current: &BTreeSet<OrderNumber>,
) -> BoardDelta {
    let Some(previous) = previous else {
        return BoardDelta::default();
    };
    BoardDelta {
        newly_arrived: current.difference(previous).copied().collect(),
        removed: previous.difference(current).copied().collect(),
    }
}
