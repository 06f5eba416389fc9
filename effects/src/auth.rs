//! On-disk credential storage.
//!
//! The token is kept base64-encoded in a single file (`~/.atelier/credential`
//! by default). Absence, emptiness and corruption all read back as the
//! anonymous session; only real IO failures surface as errors.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use atelier_core::api::{AuthToken, CredentialStore, EffectError};

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write `token` to disk, creating the parent directory if needed.
    pub async fn persist(&self, token: &AuthToken) -> Result<(), EffectError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            token.as_str().as_bytes(),
        );
        tokio::fs::write(&self.path, encoded).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<AuthToken>, EffectError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let decoded =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, trimmed);
        match decoded.map(String::from_utf8) {
            Ok(Ok(token)) => Ok(Some(AuthToken::new(token))),
            _ => {
                // A credential we cannot decode reads back as absent.
                tracing::warn!(path = %self.path.display(), "discarding unreadable credential");
                Ok(None)
            }
        }
    }

    async fn reset(&self) -> Result<(), EffectError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credential"))
    }

    #[tokio::test]
    async fn test_persist_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.persist(&AuthToken::new("tok-42")).await.unwrap();
        let token = store.get().await.unwrap();
        assert_eq!(token.map(|t| t.as_str().to_string()), Some("tok-42".into()));

        // The file itself never holds the raw token.
        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert!(!on_disk.contains("tok-42"));
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "%%% not base64 %%%").unwrap();

        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_removes_the_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.persist(&AuthToken::new("tok-42")).await.unwrap();
        store.reset().await.unwrap();
        assert!(store.get().await.unwrap().is_none());

        // Resetting an already-clean store is fine.
        store.reset().await.unwrap();
    }
}
