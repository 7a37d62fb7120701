//! Playback commands pushed to the display frontends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which sound a playback request refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum SoundSource {
    /// Bundled default for new-order alerts.
    BuiltinNewOrder,
    /// Bundled default for near-finish alerts.
    BuiltinNearFinish,
    /// An operator-uploaded file, by stored file name.
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub source: SoundSource,
    /// Loop until explicitly stopped (overdue alerts).
    pub looping: bool,
    /// 0.0 to 1.0.
    pub volume: f64,
}

#[derive(Debug, Error)]
pub enum AudioOutputError {
    /// The output refused to start without a prior user interaction.
    #[error("audio output blocked pending user interaction")]
    Blocked,

    #[error("audio playback failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn play(&self, request: PlaybackRequest) -> Result<(), AudioOutputError>;

    /// Stops any looping playback. Idempotent.
    async fn stop(&self);
}
