//! Background loops driving the board.
//!
//! Two loops run for the lifetime of the process: a poll loop that refreshes
//! the board from the POS on a fixed interval (or immediately when poked
//! through the shared `Notify`), and a faster tick loop that re-evaluates
//! countdowns between polls so threshold alerts fire within a second of
//! crossing rather than at the next poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::handlers::RefreshBoardHandler;

pub struct BoardPoller {
    board: Arc<RefreshBoardHandler>,
    refresh: Arc<Notify>,
    poll_interval: Duration,
    tick_interval: Duration,
}

impl BoardPoller {
    pub fn new(
        board: Arc<RefreshBoardHandler>,
        refresh: Arc<Notify>,
        poll_interval: Duration,
        tick_interval: Duration,
    ) -> Self {
        Self {
            board,
            refresh,
            poll_interval,
            tick_interval,
        }
    }

    /// Spawns both loops. The handles are only joined on shutdown.
    pub fn spawn(self) -> (JoinHandle<()>, JoinHandle<()>) {
        let poll = {
            let board = self.board.clone();
            let refresh = self.refresh.clone();
            let interval = self.poll_interval;
            tokio::spawn(async move {
                loop {
                    if let Err(error) = board.execute().await {
                        // The board keeps showing the last snapshot; the
                        // error surfaces through the next HTTP refresh.
                        tracing::warn!(%error, "board poll failed");
                    }
                    tokio::select! {
                        _ = tokio::time::sleep(interval) => {}
                        _ = refresh.notified() => {
                            tracing::debug!("early refresh requested");
                        }
                    }
                }
            })
        };

        let tick = {
            let board = self.board;
            let interval = self.tick_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    if let Err(error) = board.tick().await {
                        tracing::warn!(%error, "countdown tick failed");
                    }
                }
            })
        };

        (poll, tick)
    }
}
