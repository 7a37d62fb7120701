//! Audio output that fans playback commands out to connected displays.
//!
//! The server does not play audio itself; it publishes commands on a
//! broadcast channel and every display connected over the alerts WebSocket
//! receives them. Playing with no display connected is not an error, the
//! command is simply dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::ports::{AudioOutput, AudioOutputError, PlaybackRequest};

/// Wire message pushed to displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlaybackCommand {
    Play(PlaybackRequest),
    Stop,
}

pub struct BroadcastAudioOutput {
    sender: broadcast::Sender<PlaybackCommand>,
}

impl BroadcastAudioOutput {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// A receiver for one display connection.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackCommand> {
        self.sender.subscribe()
    }

    fn publish(&self, command: PlaybackCommand) {
        if let Err(error) = self.sender.send(command) {
            tracing::debug!(%error, "no display connected, dropping playback command");
        }
    }
}

#[async_trait]
impl AudioOutput for BroadcastAudioOutput {
    async fn play(&self, request: PlaybackRequest) -> Result<(), AudioOutputError> {
        self.publish(PlaybackCommand::Play(request));
        Ok(())
    }

    async fn stop(&self) {
        self.publish(PlaybackCommand::Stop);
    }
}
