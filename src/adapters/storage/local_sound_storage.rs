//! Uploaded alert sounds on local disk.
//!
//! Uploads are untrusted input: file names are reduced to a bare basename,
//! the size cap is enforced before any write, and the content is sniffed by
//! magic bytes rather than trusting the extension. Each slot has a fixed
//! file name, so an upload replaces the previous sound in place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::{SoundStorage, SoundStorageError};

pub struct LocalSoundStorage {
    dir: PathBuf,
    max_bytes: usize,
}

impl LocalSoundStorage {
    pub fn new(dir: impl AsRef<Path>, max_bytes: usize) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            max_bytes,
        }
    }

    /// Rejects anything that is not a plain `.mp3` basename.
    fn checked_path(&self, file_name: &str) -> Result<PathBuf, SoundStorageError> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SoundStorageError::InvalidName(file_name.to_string()))?;
        if name != file_name || name.starts_with('.') {
            return Err(SoundStorageError::InvalidName(file_name.to_string()));
        }
        if !name.to_ascii_lowercase().ends_with(".mp3") {
            return Err(SoundStorageError::InvalidName(file_name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

/// MP3 content check: an ID3v2 tag header, or an MPEG audio frame sync.
fn looks_like_mp3(bytes: &[u8]) -> bool {
    if bytes.len() < 3 {
        return false;
    }
    if &bytes[0..3] == b"ID3" {
        return true;
    }
    bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0
}

#[async_trait]
impl SoundStorage for LocalSoundStorage {
    async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), SoundStorageError> {
        let path = self.checked_path(file_name)?;
        if content.len() > self.max_bytes {
            return Err(SoundStorageError::TooLarge {
                got: content.len(),
                limit: self.max_bytes,
            });
        }
        if !looks_like_mp3(content) {
            return Err(SoundStorageError::NotMp3);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SoundStorageError::Io(e.to_string()))?;
        fs::write(&path, content)
            .await
            .map_err(|e| SoundStorageError::Io(e.to_string()))
    }

    async fn exists(&self, file_name: &str) -> Result<bool, SoundStorageError> {
        let path = self.checked_path(file_name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SoundStorageError::Io(e.to_string())),
        }
    }

    async fn resolve(&self, file_name: &str) -> Result<PathBuf, SoundStorageError> {
        let path = self.checked_path(file_name)?;
        if !self.exists(file_name).await? {
            return Err(SoundStorageError::NotFound(file_name.to_string()));
        }
        Ok(path)
    }

    async fn delete(&self, file_name: &str) -> Result<(), SoundStorageError> {
        let path = self.checked_path(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SoundStorageError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MP3_WITH_ID3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00rest";
    const MP3_FRAME_SYNC: &[u8] = &[0xFF, 0xFB, 0x90, 0x00, 0x01, 0x02];

    fn storage(dir: &Path) -> LocalSoundStorage {
        LocalSoundStorage::new(dir, 64)
    }

    #[tokio::test]
    async fn saves_and_resolves_mp3_content() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        storage.save("neworder.mp3", MP3_WITH_ID3).await.unwrap();
        assert!(storage.exists("neworder.mp3").await.unwrap());

        let path = storage.resolve("neworder.mp3").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), MP3_WITH_ID3);
    }

    #[tokio::test]
    async fn accepts_raw_frame_sync_without_id3_tag() {
        let dir = tempfile::tempdir().unwrap();
        storage(dir.path())
            .save("nearfinish.mp3", MP3_FRAME_SYNC)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_non_mp3_content_regardless_of_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = storage(dir.path())
            .save("neworder.mp3", b"RIFF....WAVE")
            .await;
        assert!(matches!(result, Err(SoundStorageError::NotMp3)));
    }

    #[tokio::test]
    async fn rejects_oversized_uploads_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut big = b"ID3".to_vec();
        big.resize(65, 0);

        let result = storage(dir.path()).save("neworder.mp3", &big).await;
        assert!(matches!(
            result,
            Err(SoundStorageError::TooLarge { got: 65, limit: 64 })
        ));
        assert!(!storage(dir.path()).exists("neworder.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_path_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        for name in ["../escape.mp3", "a/b.mp3", "..", ".hidden.mp3", "song.wav"] {
            assert!(
                matches!(
                    storage.save(name, MP3_WITH_ID3).await,
                    Err(SoundStorageError::InvalidName(_)) | Err(SoundStorageError::NotMp3)
                ),
                "name {name:?} should have been rejected"
            );
        }
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        storage.save("neworder.mp3", MP3_WITH_ID3).await.unwrap();
        storage.delete("neworder.mp3").await.unwrap();
        storage.delete("neworder.mp3").await.unwrap();
        assert!(!storage.exists("neworder.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn resolving_a_missing_sound_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            storage(dir.path()).resolve("neworder.mp3").await,
            Err(SoundStorageError::NotFound(_))
        ));
    }
}
