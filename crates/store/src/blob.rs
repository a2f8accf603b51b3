//! Filesystem blob backend.
//!
//! Each key is stored as a pretty-printed JSON file. A `namespace:name` key
//! maps to `<root>/namespace/name.json`. Each write goes to its own
//! uniquely named sibling file which is then renamed into place, so readers
//! never see a partial file and concurrent writers of one key resolve to
//! whichever rename lands last.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{KeyValueStore, StoreError};

const BLOB_EXTENSION: &str = "json";

/// Key-value store backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(root = %root.display(), "Blob store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its file path.
    ///
    /// Segments may contain ASCII letters, digits, `-` and `_`; `:` separates
    /// segments. Anything else is rejected so keys cannot escape `root`.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let segments: Vec<&str> = key.split(':').collect();
        let valid = segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        let mut path = self.root.clone();
        for segment in &segments {
            path.push(segment);
        }
        path.set_extension(BLOB_EXTENSION);
        Ok(path)
    }
}

#[async_trait]
impl KeyValueStore for BlobStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension(format!("{BLOB_EXTENSION}.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", self.root.display()),
            )))
        }
    }

    fn backend_name(&self) -> &'static str {
        "blob"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[tokio::test]
    async fn writes_namespaced_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        store
            .set("garden:abc-123-def", &json!({"name": "Plot"}))
            .await
            .unwrap();

        let file = dir.path().join("garden").join("abc-123-def.json");
        assert!(file.exists());
        assert_eq!(
            store.get("garden:abc-123-def").await.unwrap(),
            Some(json!({"name": "Plot"}))
        );
    }

    #[tokio::test]
    async fn missing_key_reads_none_and_deletes_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        assert!(store.get("garden:nothing-here").await.unwrap().is_none());
        assert!(!store.delete("garden:nothing-here").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        store.set("garden:to-delete-1", &json!({})).await.unwrap();
        assert!(store.delete("garden:to-delete-1").await.unwrap());
        assert!(store.get("garden:to-delete-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();

        for key in ["../escape", "garden:../../etc", "garden:", "a/b"] {
            assert_matches!(store.get(key).await, Err(StoreError::InvalidKey(_)));
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();
        tokio::fs::create_dir_all(dir.path().join("garden")).await.unwrap();
        tokio::fs::write(dir.path().join("garden").join("broken-file.json"), b"{not json")
            .await
            .unwrap();

        assert_matches!(
            store.get("garden:broken-file").await,
            Err(StoreError::Serialization(_))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_to_one_key_never_fail_or_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path()).await.unwrap();
        let small = json!({"beds": 1});
        let large = json!({"notes": "x".repeat(5000)});

        for _ in 0..50 {
            let writers: Vec<_> = (0..8)
                .map(|i| {
                    let store = store.clone();
                    let value = if i % 2 == 0 { small.clone() } else { large.clone() };
                    tokio::spawn(async move { store.set("garden:race-garden-1", &value).await })
                })
                .collect();

            for writer in writers {
                writer.await.unwrap().unwrap();
            }

            let stored = store.get("garden:race-garden-1").await.unwrap().unwrap();
            assert!(stored == small || stored == large);
        }

        let mut entries = tokio::fs::read_dir(dir.path().join("garden")).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["race-garden-1.json".to_string()]);
    }

    #[tokio::test]
    async fn health_check_passes_for_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::open(dir.path().join("nested")).await.unwrap();
        assert!(store.health_check().await.is_ok());
        assert_eq!(store.backend_name(), "blob");
    }
}
