//! Display settings persisted as a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::alert::SoundSettings;
use crate::ports::{SettingsStore, SettingsStoreError};

const FILE_NAME: &str = "settings.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSettings {
    sound: Option<SoundSettings>,
    #[serde(default)]
    categories: Vec<i64>,
}

pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(FILE_NAME),
        }
    }

    async fn read(&self) -> Result<PersistedSettings, SettingsStoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| SettingsStoreError::LoadFailed(format!("corrupt {FILE_NAME}: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedSettings::default()),
            Err(e) => Err(SettingsStoreError::LoadFailed(e.to_string())),
        }
    }

    async fn write(&self, persisted: &PersistedSettings) -> Result<(), SettingsStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsStoreError::SaveFailed(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(persisted)
            .map_err(|e| SettingsStoreError::SaveFailed(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| SettingsStoreError::SaveFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SettingsStoreError::SaveFailed(e.to_string()))
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load_sound_settings(&self) -> Result<Option<SoundSettings>, SettingsStoreError> {
        Ok(self.read().await?.sound.map(SoundSettings::normalized))
    }

    async fn save_sound_settings(
        &self,
        settings: &SoundSettings,
    ) -> Result<(), SettingsStoreError> {
        let mut persisted = self.read().await?;
        persisted.sound = Some(settings.clone());
        self.write(&persisted).await
    }

    async fn load_selected_categories(&self) -> Result<Vec<i64>, SettingsStoreError> {
        Ok(self.read().await?.categories)
    }

    async fn save_selected_categories(
        &self,
        categories: &[i64],
    ) -> Result<(), SettingsStoreError> {
        let mut persisted = self.read().await?;
        persisted.categories = categories.to_vec();
        self.write(&persisted).await
    }
}
