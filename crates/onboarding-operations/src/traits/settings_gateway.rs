use async_trait::async_trait;
use onboarding_core::{SettingKey, SettingValue};

use crate::Result;

/// In-memory app settings that write through to the key-value store.
#[async_trait]
pub trait AppSettingsGateway: Send + Sync {
    /// Current value of a setting, `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be read.
    async fn app_setting(&self, key: SettingKey) -> Result<Option<SettingValue>>;

    /// # Errors
    ///
    /// Returns an error if the setting cannot be updated or persisted.
    async fn update_app_setting(&self, key: SettingKey, value: SettingValue) -> Result<()>;

    /// Put back a stored encoding exactly as it was read from the key-value
    /// store, without decoding it. The raw string may not be a valid
    /// encoding for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw value cannot be persisted.
    async fn restore_app_setting(&self, key: SettingKey, raw: &str) -> Result<()>;

    /// Remove a setting so it reads as never set.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be removed from storage.
    async fn clear_app_setting(&self, key: SettingKey) -> Result<()>;
}
