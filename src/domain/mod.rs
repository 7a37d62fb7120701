//! Domain layer: the board's core logic, free of I/O concerns.

pub mod alert;
pub mod board;
pub mod countdown;
pub mod foundation;
pub mod order;
