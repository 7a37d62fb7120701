//! Storage for operator-uploaded alert sounds.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundStorageError {
    #[error("sound file not found: {0}")]
    NotFound(String),

    #[error("upload of {got} bytes exceeds the {limit} byte limit")]
    TooLarge { got: usize, limit: usize },

    /// Content sniffing rejected the bytes. Extensions are not trusted.
    #[error("uploaded file is not recognizable MP3 audio")]
    NotMp3,

    #[error("invalid sound file name: {0}")]
    InvalidName(String),

    #[error("sound storage io error: {0}")]
    Io(String),
}

/// Persists and serves custom alert sound files.
#[async_trait]
pub trait SoundStorage: Send + Sync {
    /// Validates and stores the uploaded bytes under the given slot name,
    /// replacing any previous file in that slot.
    async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), SoundStorageError>;

    async fn exists(&self, file_name: &str) -> Result<bool, SoundStorageError>;

    /// Resolved filesystem path for streaming the stored sound.
    async fn resolve(&self, file_name: &str) -> Result<PathBuf, SoundStorageError>;

    /// Removes a stored sound. Removing a missing file is not an error.
    async fn delete(&self, file_name: &str) -> Result<(), SoundStorageError>;
}
