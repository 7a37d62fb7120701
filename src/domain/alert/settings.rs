//! Operator-configurable alert sound settings.

use serde::{Deserialize, Serialize};

/// The two alert slots a custom sound can be uploaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundKind {
    NewOrder,
    NearFinish,
}

impl SoundKind {
    /// Fixed storage file name for this slot. Uploads replace in place, so
    /// the storage directory never accumulates files.
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundKind::NewOrder => "neworder.mp3",
            SoundKind::NearFinish => "nearfinish.mp3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    pub enabled: bool,
    /// Per-type switch for the new-order sound (also the 60% alert).
    #[serde(default = "default_on")]
    pub new_order_enabled: bool,
    /// Per-type switch for the 80% near-finish sound.
    #[serde(default = "default_on")]
    pub near_finish_enabled: bool,
    /// Playback volume, 0.0 to 1.0.
    pub volume: f64,
    /// Stored file name of the custom new-order sound, when one is uploaded.
    pub custom_new_order: Option<String>,
    pub custom_near_finish: Option<String>,
}

fn default_on() -> bool {
    true
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            new_order_enabled: true,
            near_finish_enabled: true,
            volume: 0.7,
            custom_new_order: None,
            custom_near_finish: None,
        }
    }
}

impl SoundSettings {
    /// Clamps out-of-range values loaded from storage.
    pub fn normalized(mut self) -> Self {
        if !self.volume.is_finite() {
            self.volume = Self::default().volume;
        }
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }

    pub fn custom_file(&self, kind: SoundKind) -> Option<&str> {
        match kind {
            SoundKind::NewOrder => self.custom_new_order.as_deref(),
            SoundKind::NearFinish => self.custom_near_finish.as_deref(),
        }
    }

    /// Whether this sound type is switched on, independent of the master
    /// `enabled` flag and the mute window.
    pub fn kind_enabled(&self, kind: SoundKind) -> bool {
        match kind {
            SoundKind::NewOrder => self.new_order_enabled,
            SoundKind::NearFinish => self.near_finish_enabled,
        }
    }
}
