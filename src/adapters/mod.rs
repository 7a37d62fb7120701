//! Adapter implementations of the ports.

pub mod audio;
pub mod clock;
pub mod http;
pub mod postgres;
pub mod storage;
