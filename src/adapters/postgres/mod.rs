//! PostgreSQL implementations of the POS-facing ports.

mod category_source;
mod connection;
mod order_commands;
mod order_source;

pub use category_source::PostgresCategorySource;
pub use connection::{build_pool, PgConnectionManager, SharedPool};
pub use order_commands::PostgresOrderCommands;
pub use order_source::PostgresOrderSource;
