use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait DataRefreshTrigger: Send + Sync {
    /// Reload in-memory application state from the key-value store.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data cannot be loaded.
    async fn refresh_data(&self) -> Result<()>;
}
