//! Local filesystem storage implementation.
//!
//! Each key maps to `{root}/{key}.json`. Writes go to a temp file first and
//! are renamed into place, so a reader never observes a half-written value.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a key, refusing keys that escape the root.
    fn path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(AppError::storage(key, "invalid storage key"));
        }
        Ok(self.root_dir.join(format!("{key}.json")))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        self.write_bytes(&path, value.as_bytes()).await?;
        log::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        clear_draft, clear_token, get_json, keys, load_draft, load_token, save_draft, save_token,
    };
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.set("greeting", "\"hello\"").await.unwrap();
        let data = storage.get("greeting").await.unwrap();
        assert_eq!(data.as_deref(), Some("\"hello\""));
        assert!(tmp.path().join("greeting.json").exists());
        assert!(!tmp.path().join("greeting.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.set("k", "1").await.unwrap();
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.set("../outside", "1").await.is_err());
        assert!(storage.get("/etc/passwd").await.is_err());
        assert!(storage.get("").await.is_err());
    }

    #[tokio::test]
    async fn test_unparsable_value_is_absent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.set(keys::FAVORITES, "{not json").await.unwrap();
        let parsed: Option<Vec<String>> = get_json(&storage, keys::FAVORITES).await.unwrap();
        assert!(parsed.is_none());
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_eq!(load_token(&storage).await.unwrap(), None);
        save_token(&storage, "abc.def").await.unwrap();
        assert_eq!(
            load_token(&storage).await.unwrap().as_deref(),
            Some("abc.def")
        );
        clear_token(&storage).await.unwrap();
        assert_eq!(load_token(&storage).await.unwrap(), None);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct OnboardingDraft {
        children: u8,
        preferred_sub_city: String,
    }

    #[tokio::test]
    async fn test_drafts_are_nested_per_form() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let draft = OnboardingDraft {
            children: 2,
            preferred_sub_city: "Kirkos".to_string(),
        };
        save_draft(&storage, "onboarding", &draft).await.unwrap();
        assert!(tmp.path().join("drafts/onboarding.json").exists());

        let loaded: Option<OnboardingDraft> = load_draft(&storage, "onboarding").await.unwrap();
        assert_eq!(loaded, Some(draft));

        clear_draft(&storage, "onboarding").await.unwrap();
        let cleared: Option<OnboardingDraft> = load_draft(&storage, "onboarding").await.unwrap();
        assert!(cleared.is_none());
    }
}
