//! Order line typing and row coercion.
//!
//! The query layer hands back loosely-typed rows; [`OrderLine::from_raw`]
//! turns one into a typed line and never fails. Coercion rules: malformed or
//! missing numerics become 0, missing strings become empty or `None`, and an
//! unparseable order time leaves the line without a countdown. One malformed
//! ticket must not take down the whole board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrderNumber;

/// Classification of an order line within a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// A dish in its own right; opens a new cluster.
    Main,
    /// A modification attached to the preceding main line.
    Modifier,
    /// Unrecognized item-type code; treated as a main by the grouper.
    Unknown,
}

impl LineType {
    /// Derives the line type from the raw POS item-type code.
    ///
    /// Codes are compared case-insensitively; anything other than the two
    /// known codes maps to [`LineType::Unknown`].
    pub fn from_code(code: Option<&str>) -> Self {
        match code.unwrap_or("").trim().to_ascii_uppercase().as_str() {
            "I" => LineType::Main,
            "M" => LineType::Modifier,
            _ => LineType::Unknown,
        }
    }
}

/// One raw row from the active-orders query, before coercion.
///
/// Every field is optional; the row mapper decides the defaults. This is the
/// explicit schema replacing the query layer's arbitrary key/value maps.
#[derive(Debug, Clone, Default)]
pub struct RawOrderRow {
    pub order_number: Option<i64>,
    pub category_code: Option<i64>,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub item_name_localized: Option<String>,
    pub quantity: Option<f64>,
    pub order_time: Option<DateTime<Utc>>,
    pub time_to_finish_minutes: Option<f64>,
    pub finished: Option<bool>,
    pub table_id: Option<String>,
    pub table_description: Option<String>,
    pub comments: Option<String>,
    pub item_type: Option<String>,
    pub department_code: Option<String>,
    pub department_name: Option<String>,
}

/// One typed row of a kitchen ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Groups lines into one ticket; `None` means the line cannot be placed
    /// on the board and the grouper drops it.
    pub order_number: Option<OrderNumber>,
    pub category_code: Option<i64>,
    pub item_code: String,
    pub item_name: String,
    pub item_name_localized: Option<String>,
    pub quantity: u32,
    pub line_type: LineType,
    /// When the line was sent to the kitchen; `None` means no countdown is
    /// ever rendered for the ticket.
    pub order_time: Option<DateTime<Utc>>,
    /// Preparation budget in minutes. Never negative; 0 means no deadline.
    pub time_to_finish_minutes: u32,
    pub finished: Option<bool>,
    pub table_id: Option<String>,
    pub table_description: Option<String>,
    pub comments: Option<String>,
    pub department_code: String,
    pub department_name: Option<String>,
}

impl OrderLine {
    /// Converts one raw row into a typed order line. Never fails.
    pub fn from_raw(row: RawOrderRow) -> Self {
        Self {
            order_number: row.order_number.map(OrderNumber::new),
            category_code: row.category_code,
            item_code: row.item_code.unwrap_or_default(),
            item_name: row.item_name.unwrap_or_default(),
            item_name_localized: row.item_name_localized.filter(|s| !s.is_empty()),
            quantity: coerce_non_negative(row.quantity),
            line_type: LineType::from_code(row.item_type.as_deref()),
            order_time: row.order_time,
            time_to_finish_minutes: coerce_non_negative(row.time_to_finish_minutes),
            finished: row.finished,
            table_id: row.table_id,
            table_description: row.table_description,
            comments: row.comments.filter(|s| !s.is_empty()),
            department_code: row.department_code.unwrap_or_default(),
            department_name: row.department_name.filter(|s| !s.is_empty()),
        }
    }
}

/// Coerces an optional float to a non-negative integer.
///
/// Negative, NaN, and non-finite values all become 0 so a bad prep-time or
/// quantity value degrades to "no deadline" / "zero items" instead of a
/// panic or a nonsense countdown.
fn coerce_non_negative(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.floor() as u32,
        Some(v) if !v.is_finite() || v < 0.0 => {
            tracing::debug!(value = v, "coercing invalid numeric field to 0");
            0
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw_with(f: impl FnOnce(&mut RawOrderRow)) -> RawOrderRow {
        let mut row = RawOrderRow {
            order_number: Some(101),
            item_code: Some("BRG-01".to_string()),
            item_name: Some("Cheeseburger".to_string()),
            quantity: Some(2.0),
            order_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            time_to_finish_minutes: Some(10.0),
            item_type: Some("I".to_string()),
            ..Default::default()
        };
        f(&mut row);
        row
    }

    #[test]
    fn maps_complete_row() {
        let line = OrderLine::from_raw(raw_with(|_| {}));
        assert_eq!(line.order_number, Some(OrderNumber::new(101)));
        assert_eq!(line.item_name, "Cheeseburger");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_type, LineType::Main);
        assert_eq!(line.time_to_finish_minutes, 10);
    }

    #[test]
    fn line_type_derivation_is_case_insensitive() {
        assert_eq!(LineType::from_code(Some("i")), LineType::Main);
        assert_eq!(LineType::from_code(Some("m")), LineType::Modifier);
        assert_eq!(LineType::from_code(Some(" M ")), LineType::Modifier);
    }

    #[test]
    fn unrecognized_item_type_maps_to_unknown() {
        assert_eq!(LineType::from_code(Some("X")), LineType::Unknown);
        assert_eq!(LineType::from_code(Some("")), LineType::Unknown);
        assert_eq!(LineType::from_code(None), LineType::Unknown);
    }

    #[test]
    fn negative_prep_time_coerces_to_zero() {
        let line = OrderLine::from_raw(raw_with(|r| r.time_to_finish_minutes = Some(-3.0)));
        assert_eq!(line.time_to_finish_minutes, 0);
    }

    #[test]
    fn non_finite_numeric_coerces_to_zero() {
        let line = OrderLine::from_raw(raw_with(|r| r.quantity = Some(f64::NAN)));
        assert_eq!(line.quantity, 0);

        let line = OrderLine::from_raw(raw_with(|r| r.quantity = Some(f64::INFINITY)));
        assert_eq!(line.quantity, 0);
    }

    #[test]
    fn missing_fields_coerce_to_defaults() {
        let line = OrderLine::from_raw(RawOrderRow::default());
        assert_eq!(line.order_number, None);
        assert_eq!(line.item_code, "");
        assert_eq!(line.quantity, 0);
        assert_eq!(line.line_type, LineType::Unknown);
        assert!(line.order_time.is_none());
        assert_eq!(line.comments, None);
    }

    #[test]
    fn empty_comments_become_none() {
        let line = OrderLine::from_raw(raw_with(|r| r.comments = Some(String::new())));
        assert_eq!(line.comments, None);

        let line = OrderLine::from_raw(raw_with(|r| r.comments = Some("no onions".to_string())));
        assert_eq!(line.comments.as_deref(), Some("no onions"));
    }
}
