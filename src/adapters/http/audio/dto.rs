//! HTTP DTOs for the audio endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::alert::{MuteSnapshot, SoundKind, SoundSettings};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Settings an operator can change directly. Custom sound slots are managed
/// through the upload/delete endpoints, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSoundSettingsRequest {
    pub enabled: bool,
    #[serde(default = "on")]
    pub new_order_enabled: bool,
    #[serde(default = "on")]
    pub near_finish_enabled: bool,
    pub volume: f64,
}

fn on() -> bool {
    true
}

/// Path segment naming a custom sound slot.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundSlot {
    NewOrder,
    NearFinish,
}

impl From<SoundSlot> for SoundKind {
    fn from(slot: SoundSlot) -> Self {
        match slot {
            SoundSlot::NewOrder => SoundKind::NewOrder,
            SoundSlot::NearFinish => SoundKind::NearFinish,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct SoundSettingsResponse {
    pub enabled: bool,
    pub new_order_enabled: bool,
    pub near_finish_enabled: bool,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_new_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_near_finish: Option<String>,
    pub needs_interaction: bool,
}

impl SoundSettingsResponse {
    pub fn from_settings(settings: SoundSettings, needs_interaction: bool) -> Self {
        Self {
            enabled: settings.enabled,
            new_order_enabled: settings.new_order_enabled,
            near_finish_enabled: settings.near_finish_enabled,
            volume: settings.volume,
            custom_new_order: settings.custom_new_order,
            custom_near_finish: settings.custom_near_finish,
            needs_interaction,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SoundCheckResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MuteResponse {
    pub muted: bool,
    pub needs_interaction: bool,
}

impl From<MuteSnapshot> for MuteResponse {
    fn from(snapshot: MuteSnapshot) -> Self {
        Self {
            muted: snapshot.muted,
            needs_interaction: snapshot.needs_interaction,
        }
    }
}
