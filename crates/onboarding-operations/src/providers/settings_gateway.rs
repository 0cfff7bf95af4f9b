use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use onboarding_core::{SettingKey, SettingValue};
use tokio::sync::RwLock;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{AppSettingsGateway, KeyValueStore};

/// Settings cache backed by a [`KeyValueStore`].
///
/// Reads fall through to the store on a cache miss. Writes go to the store
/// first and only reach the cache once persisted.
pub struct StoreSettingsGateway {
    store: Arc<dyn KeyValueStore>,
    cache: RwLock<HashMap<SettingKey, Option<SettingValue>>>,
}

impl StoreSettingsGateway {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn settings_error(key: SettingKey, err: &OperationError) -> OperationError {
        OperationError::Settings {
            key: key.name().to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl AppSettingsGateway for StoreSettingsGateway {
    async fn app_setting(&self, key: SettingKey) -> Result<Option<SettingValue>> {
        if let Some(cached) = self.cache.read().await.get(&key) {
            return Ok(cached.clone());
        }

        let raw = self
            .store
            .get_item(&key.storage_key())
            .await
            .map_err(|e| Self::settings_error(key, &e))?;
        let value = raw.as_deref().map(|raw| key.decode(raw)).transpose()?;

        self.cache.write().await.insert(key, value.clone());
        Ok(value)
    }

    async fn update_app_setting(&self, key: SettingKey, value: SettingValue) -> Result<()> {
        self.store
            .set_item(&key.storage_key(), &value.encode())
            .await
            .map_err(|e| Self::settings_error(key, &e))?;
        debug!(setting = %key, value = %value, "updated app setting");
        self.cache.write().await.insert(key, Some(value));
        Ok(())
    }

    async fn restore_app_setting(&self, key: SettingKey, raw: &str) -> Result<()> {
        self.store
            .set_item(&key.storage_key(), raw)
            .await
            .map_err(|e| Self::settings_error(key, &e))?;
        debug!(setting = %key, "restored raw app setting");
        // Decoded lazily on the next read.
        self.cache.write().await.remove(&key);
        Ok(())
    }

    async fn clear_app_setting(&self, key: SettingKey) -> Result<()> {
        self.store
            .remove_item(&key.storage_key())
            .await
            .map_err(|e| Self::settings_error(key, &e))?;
        debug!(setting = %key, "cleared app setting");
        self.cache.write().await.insert(key, None);
        Ok(())
    }
}
