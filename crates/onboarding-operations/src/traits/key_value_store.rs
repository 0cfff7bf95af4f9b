use async_trait::async_trait;

use crate::Result;

/// Durable, process-wide string store.
///
/// There are no multi-key transactions and no isolation between writers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be updated.
    async fn remove_item(&self, key: &str) -> Result<()>;
}
