//! Board polling and countdown configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the board refresh loop and countdown persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Seconds between full board re-fetches
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Seconds between countdown ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// Seconds a mute lasts before clearing itself
    #[serde(default = "default_mute_window")]
    pub mute_window_secs: u64,

    /// Directory for persisted timer state and sound settings
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl DisplayConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Tick interval as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Mute window as a Duration
    pub fn mute_window(&self) -> Duration {
        Duration::from_secs(self.mute_window_secs)
    }

    /// Validate display configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_secs == 0 || self.poll_interval_secs > 300 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.tick_interval_secs == 0 {
            return Err(ValidationError::InvalidTickInterval);
        }
        if self.mute_window_secs == 0 {
            return Err(ValidationError::InvalidMuteWindow);
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            tick_interval_secs: default_tick_interval(),
            mute_window_secs: default_mute_window(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

fn default_tick_interval() -> u64 {
    1
}

fn default_mute_window() -> u64 {
    10
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("data/state")
}
