//! Custom alert sound storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Configuration for the custom sound directory and upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Directory where uploaded alert sounds are stored
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl AudioConfig {
    /// Validate audio configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_dir: default_sound_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_sound_dir() -> PathBuf {
    PathBuf::from("data/sounds/custom")
}

fn default_max_upload_bytes() -> u64 {
    5 * 1024 * 1024
}
