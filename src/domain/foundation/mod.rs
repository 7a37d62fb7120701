//! Shared value objects and the domain error taxonomy.

mod command;
mod errors;
mod order_number;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode};
pub use order_number::OrderNumber;
