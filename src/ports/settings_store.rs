//! Persistence for operator-facing display settings.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::alert::SoundSettings;

#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("failed to load settings: {0}")]
    LoadFailed(String),

    #[error("failed to save settings: {0}")]
    SaveFailed(String),
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `None` when no settings were ever saved; callers apply defaults.
    async fn load_sound_settings(&self) -> Result<Option<SoundSettings>, SettingsStoreError>;

    async fn save_sound_settings(&self, settings: &SoundSettings)
        -> Result<(), SettingsStoreError>;

    /// Category codes the display is filtered to; empty means all.
    async fn load_selected_categories(&self) -> Result<Vec<i64>, SettingsStoreError>;

    async fn save_selected_categories(&self, categories: &[i64])
        -> Result<(), SettingsStoreError>;
}
