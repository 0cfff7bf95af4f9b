use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::KeyValueStore;

/// Store persisted as a single JSON object file.
///
/// The file is read on first access. Every mutation rewrites the whole file
/// through a sibling temp file followed by a rename, so a crash never leaves
/// a half-written store behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: Mutex<Option<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| self.error(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(self.error(e)),
        }
    }

    async fn persist(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(items)?;
        let temp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.error(e))?;
        }
        tokio::fs::write(&temp_path, contents)
            .await
            .map_err(|e| self.error(e))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.error(e))?;

        debug!(path = %self.path.display(), items = items.len(), "persisted store");
        Ok(())
    }

    async fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let Some(items) = guard.as_mut() else {
            return Ok(());
        };

        let mut updated = items.clone();
        if apply(&mut updated) {
            self.persist(&updated).await?;
            *items = updated;
        }
        Ok(())
    }

    fn error(&self, err: impl std::fmt::Display) -> OperationError {
        OperationError::store(&self.path.display().to_string(), err)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.as_ref().and_then(|items| items.get(key).cloned()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.mutate(|items| items.remove(key).is_some()).await
    }
}
