//! Admin endpoints: reconnection, liveness, and category selection.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AdminHandlers;
pub use routes::admin_routes;
