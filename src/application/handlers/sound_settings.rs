//! Alert sound configuration: settings, uploads, mute, and audio unlock.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::alert::{AlertDispatcher, MuteSnapshot, SoundKind, SoundSettings};
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode};
use crate::ports::{SettingsStore, SoundStorage, SoundStorageError};

pub struct SoundSettingsHandler {
    settings: Arc<dyn SettingsStore>,
    storage: Arc<dyn SoundStorage>,
    alerts: Arc<AlertDispatcher>,
}

impl SoundSettingsHandler {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        storage: Arc<dyn SoundStorage>,
        alerts: Arc<AlertDispatcher>,
    ) -> Self {
        Self {
            settings,
            storage,
            alerts,
        }
    }

    pub async fn current(&self) -> SoundSettings {
        self.alerts.settings().await
    }

    /// Persists new settings and applies them to the live dispatcher.
    pub async fn update(&self, new: SoundSettings) -> Result<SoundSettings, DomainError> {
        if !new.volume.is_finite() || !(0.0..=1.0).contains(&new.volume) {
            return Err(DomainError::validation(
                "volume",
                "Volume must be between 0.0 and 1.0",
            ));
        }
        self.settings
            .save_sound_settings(&new)
            .await
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?;
        self.alerts.apply_settings(new.clone()).await;
        Ok(new)
    }

    /// Stores an uploaded custom sound and points the slot at it.
    pub async fn upload(
        &self,
        kind: SoundKind,
        content: &[u8],
        metadata: CommandMetadata,
    ) -> Result<SoundSettings, DomainError> {
        let file_name = kind.file_name();
        self.storage
            .save(file_name, content)
            .await
            .map_err(map_storage_error)?;

        tracing::info!(
            file = file_name,
            bytes = content.len(),
            performed_by = %metadata.performed_by,
            "custom alert sound uploaded"
        );

        let mut settings = self.alerts.settings().await;
        match kind {
            SoundKind::NewOrder => settings.custom_new_order = Some(file_name.to_string()),
            SoundKind::NearFinish => settings.custom_near_finish = Some(file_name.to_string()),
        }
        self.update(settings).await
    }

    /// Deletes a custom sound and reverts the slot to the bundled default.
    pub async fn remove_custom(
        &self,
        kind: SoundKind,
        metadata: CommandMetadata,
    ) -> Result<SoundSettings, DomainError> {
        self.storage
            .delete(kind.file_name())
            .await
            .map_err(map_storage_error)?;

        tracing::info!(
            file = kind.file_name(),
            performed_by = %metadata.performed_by,
            "custom alert sound removed"
        );

        let mut settings = self.alerts.settings().await;
        match kind {
            SoundKind::NewOrder => settings.custom_new_order = None,
            SoundKind::NearFinish => settings.custom_near_finish = None,
        }
        self.update(settings).await
    }

    /// Whether a custom sound is stored for the slot. Absence is a normal
    /// answer, not an error; storage failures read as absent.
    pub async fn custom_exists(&self, kind: SoundKind) -> bool {
        match self.storage.exists(kind.file_name()).await {
            Ok(exists) => exists,
            Err(error) => {
                tracing::warn!(%error, file = kind.file_name(), "custom sound check failed");
                false
            }
        }
    }

    /// Filesystem path of a stored custom sound, for streaming.
    pub async fn resolve_sound(&self, file_name: &str) -> Result<PathBuf, DomainError> {
        self.storage
            .resolve(file_name)
            .await
            .map_err(map_storage_error)
    }

    pub async fn toggle_mute(&self) -> MuteSnapshot {
        self.alerts.toggle_mute().await
    }

    pub async fn unlock_audio(&self) {
        self.alerts.unlock_audio().await;
    }

    pub fn needs_interaction(&self) -> bool {
        self.alerts.needs_interaction()
    }
}

fn map_storage_error(error: SoundStorageError) -> DomainError {
    match error {
        SoundStorageError::NotFound(name) => DomainError::new(
            ErrorCode::SoundNotFound,
            format!("No custom sound named {name}"),
        ),
        SoundStorageError::TooLarge { got, limit } => {
            DomainError::validation("file", "Uploaded sound exceeds the size limit")
                .with_detail("got_bytes", got.to_string())
                .with_detail("limit_bytes", limit.to_string())
        }
        SoundStorageError::NotMp3 => {
            DomainError::validation("file", "Uploaded file is not MP3 audio")
        }
        SoundStorageError::InvalidName(name) => DomainError::validation(
            "file",
            format!("Invalid sound file name: {name}"),
        ),
        SoundStorageError::Io(reason) => DomainError::new(ErrorCode::StorageError, reason),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use crate::adapters::clock::ManualClock;
    use crate::ports::{
        AudioOutput, AudioOutputError, PlaybackRequest, SettingsStoreError,
    };

    use super::*;

    struct SilentOutput;

    #[async_trait]
    impl AudioOutput for SilentOutput {
        async fn play(&self, _: PlaybackRequest) -> Result<(), AudioOutputError> {
            Ok(())
        }
        async fn stop(&self) {}
    }

    #[derive(Default)]
    struct MemorySoundStorage {
        files: StdMutex<HashMap<String, Vec<u8>>>,
        max_bytes: Option<usize>,
    }

    #[async_trait]
    impl SoundStorage for MemorySoundStorage {
        async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), SoundStorageError> {
            if let Some(limit) = self.max_bytes {
                if content.len() > limit {
                    return Err(SoundStorageError::TooLarge {
                        got: content.len(),
                        limit,
                    });
                }
            }
            if !content.starts_with(b"ID3") {
                return Err(SoundStorageError::NotMp3);
            }
            self.files
                .lock()
                .unwrap()
                .insert(file_name.to_string(), content.to_vec());
            Ok(())
        }

        async fn exists(&self, file_name: &str) -> Result<bool, SoundStorageError> {
            Ok(self.files.lock().unwrap().contains_key(file_name))
        }

        async fn resolve(&self, file_name: &str) -> Result<PathBuf, SoundStorageError> {
            if self.exists(file_name).await? {
                Ok(PathBuf::from(file_name))
            } else {
                Err(SoundStorageError::NotFound(file_name.to_string()))
            }
        }

        async fn delete(&self, file_name: &str) -> Result<(), SoundStorageError> {
            self.files.lock().unwrap().remove(file_name);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemorySettings {
        sound: StdMutex<Option<SoundSettings>>,
    }

    #[async_trait]
    impl SettingsStore for MemorySettings {
        async fn load_sound_settings(&self) -> Result<Option<SoundSettings>, SettingsStoreError> {
            Ok(self.sound.lock().unwrap().clone())
        }
        async fn save_sound_settings(
            &self,
            settings: &SoundSettings,
        ) -> Result<(), SettingsStoreError> {
            *self.sound.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
        async fn load_selected_categories(&self) -> Result<Vec<i64>, SettingsStoreError> {
            Ok(Vec::new())
        }
        async fn save_selected_categories(&self, _: &[i64]) -> Result<(), SettingsStoreError> {
            Ok(())
        }
    }

    fn fixture(storage: MemorySoundStorage) -> (SoundSettingsHandler, Arc<MemorySettings>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        ));
        let storage = Arc::new(storage);
        let settings = Arc::new(MemorySettings::default());
        let alerts = Arc::new(AlertDispatcher::new(
            Arc::new(SilentOutput),
            storage.clone(),
            clock,
            Duration::from_secs(10),
            SoundSettings::default(),
        ));
        let handler = SoundSettingsHandler::new(settings.clone(), storage, alerts);
        (handler, settings)
    }

    #[tokio::test]
    async fn upload_stores_the_file_and_updates_the_slot() {
        let (handler, persisted) = fixture(MemorySoundStorage::default());

        let settings = handler
            .upload(SoundKind::NewOrder, b"ID3rest", CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(settings.custom_new_order.as_deref(), Some("neworder.mp3"));
        assert_eq!(
            persisted
                .sound
                .lock()
                .unwrap()
                .as_ref()
                .unwrap()
                .custom_new_order
                .as_deref(),
            Some("neworder.mp3")
        );
        assert!(handler.resolve_sound("neworder.mp3").await.is_ok());
    }

    #[tokio::test]
    async fn rejected_upload_leaves_settings_untouched() {
        let (handler, persisted) = fixture(MemorySoundStorage::default());

        let error = handler
            .upload(SoundKind::NewOrder, b"not audio", CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert!(persisted.sound.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn oversized_upload_reports_both_sizes() {
        let (handler, _) = fixture(MemorySoundStorage {
            max_bytes: Some(4),
            ..Default::default()
        });

        let error = handler
            .upload(SoundKind::NearFinish, b"ID3xx", CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(error.details.get("got_bytes").map(String::as_str), Some("5"));
        assert_eq!(error.details.get("limit_bytes").map(String::as_str), Some("4"));
    }

    #[tokio::test]
    async fn removing_a_custom_sound_reverts_to_the_default() {
        let (handler, _) = fixture(MemorySoundStorage::default());

        handler
            .upload(SoundKind::NearFinish, b"ID3rest", CommandMetadata::test_fixture())
            .await
            .unwrap();
        let settings = handler
            .remove_custom(SoundKind::NearFinish, CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(settings.custom_near_finish, None);
        assert!(matches!(
            handler.resolve_sound("nearfinish.mp3").await.unwrap_err().code,
            ErrorCode::SoundNotFound
        ));
    }

    #[tokio::test]
    async fn per_type_switch_persists_and_applies() {
        let (handler, persisted) = fixture(MemorySoundStorage::default());

        handler
            .update(SoundSettings {
                near_finish_enabled: false,
                ..Default::default()
            })
            .await
            .unwrap();

        let stored = persisted.sound.lock().unwrap().clone().unwrap();
        assert!(!stored.near_finish_enabled);
        assert!(stored.new_order_enabled);
        assert!(!handler.current().await.near_finish_enabled);
    }

    #[tokio::test]
    async fn out_of_range_volume_is_rejected() {
        let (handler, _) = fixture(MemorySoundStorage::default());

        let error = handler
            .update(SoundSettings {
                volume: 1.5,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::ValidationFailed);
    }
}
