//! Application services: use-case handlers and the background poller.

pub mod handlers;
pub mod poller;

pub use poller::BoardPoller;
