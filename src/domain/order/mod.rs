//! Kitchen order lines and ticket grouping.

mod grouper;
mod line;

pub use grouper::{group_order_lines, Ticket};
pub use line::{LineType, OrderLine, RawOrderRow};
