//! JSON file holding the interest list.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::InterestSet;

/// Persisted interest list, overwritten wholesale on every change.
#[derive(Debug, Clone)]
pub struct InterestStore {
    path: PathBuf,
}

impl InterestStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the interest list. A missing file yields an empty set.
    pub async fn load(&self) -> Result<InterestSet, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No interest file, starting empty");
                return Ok(InterestSet::default());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let set: InterestSet = serde_json::from_str(&raw)?;
        tracing::info!(path = %self.path.display(), "Loaded interests");
        Ok(set)
    }

    /// Write the interest list through a temporary sibling file and rename.
    pub async fn save(&self, interests: &InterestSet) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(interests)?;
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, json).await.map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "Saved interests");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[tokio::test]
    async fn test_missing_file_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterestStore::new(dir.path().join("interests.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterestStore::new(dir.path().join("interests.json"));
        let mut set = InterestSet::default();
        set.add(Category::Authors, ["Jane Q. Public"]);
        set.add(Category::Keywords, ["TWPA"]);

        store.save(&set).await.unwrap();
        assert_eq!(store.load().await.unwrap(), set);
        assert!(!dir.path().join("interests.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interests.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(InterestStore::new(path).load().await, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = InterestStore::new(dir.path().join("missing").join("interests.json"));
        assert!(matches!(store.save(&InterestSet::default()).await, Err(StoreError::Io { .. })));
    }
}
