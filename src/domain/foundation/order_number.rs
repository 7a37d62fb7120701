//! Order number value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, ErrorCode};

/// The number grouping all lines of one kitchen ticket.
///
/// Order numbers come from the point of sale and may be reused after an
/// order is finished, which is why every per-order state (timers, alert
/// flags) must be torn down when the order leaves the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(i64);

impl OrderNumber {
    /// Creates an OrderNumber from a raw POS value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Stable string form used as the key for persisted timer state.
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| {
                DomainError::new(
                    ErrorCode::InvalidOrderNumber,
                    format!("Not a valid order number: {}", s),
                )
            })
    }
}
