//! Groups flat order lines into per-order tickets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrderNumber;

use super::{LineType, OrderLine};

/// One main item together with the modifiers that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub main: OrderLine,
    pub modifiers: Vec<OrderLine>,
}

impl Ticket {
    fn new(main: OrderLine) -> Self {
        Self {
            main,
            modifiers: Vec::new(),
        }
    }

    /// Total item count across the main line and its modifiers.
    pub fn total_quantity(&self) -> u32 {
        self.main.quantity + self.modifiers.iter().map(|m| m.quantity).sum::<u32>()
    }
}

/// Partitions order lines into per-order main+modifier clusters.
///
/// The input must already be sorted by order time ascending; this is a
/// precondition of the query and is not re-verified here. Within each order
/// number, modifiers attach to the most recently opened main line, so the
/// grouping is strictly local to scan order.
///
/// Rules:
/// - lines without an order number are dropped (warn),
/// - a MAIN line closes the current cluster and opens a new one,
/// - a MODIFIER attaches to the open cluster, or is dropped (debug) when no
///   cluster is open yet,
/// - an UNKNOWN line is treated as a MAIN rather than silently discarded,
/// - order numbers that yield zero clusters are omitted.
pub fn group_order_lines(lines: Vec<OrderLine>) -> BTreeMap<OrderNumber, Vec<Ticket>> {
    let mut buckets: BTreeMap<OrderNumber, Vec<OrderLine>> = BTreeMap::new();
    for line in lines {
        match line.order_number {
            Some(number) => buckets.entry(number).or_default().push(line),
            None => {
                tracing::warn!(item_code = %line.item_code, "dropping line with no order number");
            }
        }
    }

    let mut grouped = BTreeMap::new();
    for (number, bucket) in buckets {
        let tickets = cluster_bucket(number, bucket);
        if !tickets.is_empty() {
            grouped.insert(number, tickets);
        }
    }
    grouped
}

fn cluster_bucket(number: OrderNumber, bucket: Vec<OrderLine>) -> Vec<Ticket> {
    let mut tickets = Vec::new();
    let mut current: Option<Ticket> = None;

    for line in bucket {
        match line.line_type {
            LineType::Main => {
                if let Some(ticket) = current.take() {
                    tickets.push(ticket);
                }
                current = Some(Ticket::new(line));
            }
            LineType::Modifier => match current.as_mut() {
                Some(ticket) => ticket.modifiers.push(line),
                None => {
                    tracing::debug!(
                        order_number = %number,
                        item_code = %line.item_code,
                        "dropping modifier with no open main line"
                    );
                }
            },
            LineType::Unknown => {
                tracing::warn!(
                    order_number = %number,
                    item_code = %line.item_code,
                    "unknown item type, treating as main line"
                );
                if let Some(ticket) = current.take() {
                    tickets.push(ticket);
                }
                current = Some(Ticket::new(line));
            }
        }
    }

    if let Some(ticket) = current.take() {
        tickets.push(ticket);
    }
    tickets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::RawOrderRow;

    fn line(order: Option<i64>, item: &str, line_type: &str) -> OrderLine {
        OrderLine::from_raw(RawOrderRow {
            order_number: order,
            item_code: Some(item.to_string()),
            item_name: Some(item.to_string()),
            quantity: Some(1.0),
            item_type: Some(line_type.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn groups_mains_with_following_modifiers() {
        let grouped = group_order_lines(vec![
            line(Some(101), "burger", "I"),
            line(Some(101), "no-onion", "M"),
            line(Some(101), "extra-cheese", "M"),
            line(Some(101), "fries", "I"),
        ]);

        let tickets = &grouped[&OrderNumber::new(101)];
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].main.item_code, "burger");
        assert_eq!(tickets[0].modifiers.len(), 2);
        assert_eq!(tickets[1].main.item_code, "fries");
        assert!(tickets[1].modifiers.is_empty());
    }

    #[test]
    fn partitions_by_order_number() {
        let grouped = group_order_lines(vec![
            line(Some(101), "burger", "I"),
            line(Some(102), "pizza", "I"),
            line(Some(101), "no-onion", "M"),
        ]);

        // The modifier appears after order 102's main in the flat list, but
        // it still attaches within its own order's bucket.
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&OrderNumber::new(101)][0].modifiers.len(), 1);
        assert!(grouped[&OrderNumber::new(102)][0].modifiers.is_empty());
    }

    #[test]
    fn drops_modifier_before_any_main() {
        let grouped = group_order_lines(vec![
            line(Some(101), "orphan-mod", "M"),
            line(Some(101), "burger", "I"),
        ]);

        let tickets = &grouped[&OrderNumber::new(101)];
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].main.item_code, "burger");
        assert!(tickets[0].modifiers.is_empty());
    }

    #[test]
    fn unknown_type_opens_a_new_cluster() {
        let grouped = group_order_lines(vec![
            line(Some(101), "burger", "I"),
            line(Some(101), "mystery", "X"),
            line(Some(101), "sauce", "M"),
        ]);

        let tickets = &grouped[&OrderNumber::new(101)];
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].main.item_code, "mystery");
        assert_eq!(tickets[1].modifiers.len(), 1);
    }

    #[test]
    fn drops_lines_without_order_number() {
        let grouped = group_order_lines(vec![
            line(None, "stray", "I"),
            line(Some(101), "burger", "I"),
        ]);

        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(&OrderNumber::new(101)));
    }

    #[test]
    fn bucket_with_only_orphan_modifiers_is_omitted() {
        let grouped = group_order_lines(vec![
            line(Some(103), "orphan-1", "M"),
            line(Some(103), "orphan-2", "M"),
            line(Some(101), "burger", "I"),
        ]);

        assert_eq!(grouped.len(), 1);
        assert!(!grouped.contains_key(&OrderNumber::new(103)));
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(group_order_lines(Vec::new()).is_empty());
    }

    #[test]
    fn ticket_total_quantity_sums_main_and_modifiers() {
        let mut ticket = Ticket::new(line(Some(101), "burger", "I"));
        ticket.modifiers.push(line(Some(101), "cheese", "M"));
        ticket.modifiers.push(line(Some(101), "bacon", "M"));
        assert_eq!(ticket.total_quantity(), 3);
    }
}
