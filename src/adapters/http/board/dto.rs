//! HTTP DTOs for the board endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::handlers::{BoardOrder, BoardSnapshot};
use crate::domain::countdown::CountdownStatus;
use crate::domain::order::{OrderLine, Ticket};

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct BoardResponse {
    pub orders: Vec<OrderResponse>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_description: Option<String>,
    pub tickets: Vec<TicketResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub main: LineResponse,
    pub modifiers: Vec<LineResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineResponse {
    pub item_code: String,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name_localized: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountdownResponse {
    pub remaining_seconds: u64,
    pub display: String,
    pub elapsed_percent: u8,
    pub severity: String,
    pub expired: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinishOrderResponse {
    pub order_number: i64,
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Conversions
// ════════════════════════════════════════════════════════════════════════════

impl From<BoardSnapshot> for BoardResponse {
    fn from(snapshot: BoardSnapshot) -> Self {
        Self {
            orders: snapshot.orders.into_iter().map(OrderResponse::from).collect(),
            generated_at: snapshot.generated_at,
        }
    }
}

impl From<BoardOrder> for OrderResponse {
    fn from(order: BoardOrder) -> Self {
        Self {
            order_number: order.order_number.value(),
            table_id: order.table_id,
            table_description: order.table_description,
            tickets: order.tickets.into_iter().map(TicketResponse::from).collect(),
            countdown: order.countdown.map(CountdownResponse::from),
        }
    }
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            main: LineResponse::from(ticket.main),
            modifiers: ticket.modifiers.into_iter().map(LineResponse::from).collect(),
        }
    }
}

impl From<OrderLine> for LineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            item_code: line.item_code,
            item_name: line.item_name,
            item_name_localized: line.item_name_localized,
            quantity: line.quantity,
            comments: line.comments,
            department_name: line.department_name,
        }
    }
}

impl From<CountdownStatus> for CountdownResponse {
    fn from(status: CountdownStatus) -> Self {
        Self {
            remaining_seconds: status.remaining_seconds,
            display: status.display,
            elapsed_percent: status.elapsed_percent,
            severity: status.severity.as_str().to_string(),
            expired: status.expired,
        }
    }
}
