//! Kitchen Display System backend.
//!
//! Serves point-of-sale kitchen tickets over HTTP, tracks per-order
//! preparation countdowns, and dispatches sound alerts to connected displays.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
