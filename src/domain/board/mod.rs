//! Board-level reconciliation between poll cycles.

mod reconcile;

pub use reconcile::{reconcile, BoardDelta};
