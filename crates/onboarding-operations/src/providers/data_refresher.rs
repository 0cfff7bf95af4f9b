use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::data_creator::{GoalRecord, load_goals};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{DataRefreshTrigger, KeyValueStore};

/// Keeps an in-memory copy of the stored goals.
pub struct StoreDataRefresher {
    store: Arc<dyn KeyValueStore>,
    goals: RwLock<Vec<GoalRecord>>,
}

impl StoreDataRefresher {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            goals: RwLock::new(Vec::new()),
        }
    }

    /// Goals as of the last refresh.
    pub async fn goals(&self) -> Vec<GoalRecord> {
        self.goals.read().await.clone()
    }
}

#[async_trait]
impl DataRefreshTrigger for StoreDataRefresher {
    async fn refresh_data(&self) -> Result<()> {
        let goals = load_goals(self.store.as_ref())
            .await
            .map_err(|e| OperationError::Refresh(e.to_string()))?;
        debug!(goals = goals.len(), "refreshed app data");
        *self.goals.write().await = goals;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use onboarding_core::{DomainTemplate, GoalTemplate};

    use super::*;
    use crate::providers::{GOALS_KEY, MemoryStore, StoreDataCreator};
    use crate::traits::OnboardingDataCreator;

    #[tokio::test]
    async fn refresh_loads_goals_written_since_last_refresh() -> anyhow::Result<()> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let refresher = StoreDataRefresher::new(Arc::clone(&store));
        refresher.refresh_data().await?;
        assert!(refresher.goals().await.is_empty());

        StoreDataCreator::new(Arc::clone(&store))
            .create_onboarding_data(&DomainTemplate::new("Career"), &GoalTemplate::new("Lead"))
            .await;
        refresher.refresh_data().await?;

        assert_eq!(refresher.goals().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_goal_list_fails_refresh() {
        let store = Arc::new(MemoryStore::with_items([(GOALS_KEY, "{")]));
        let refresher = StoreDataRefresher::new(store);

        let err = refresher.refresh_data().await.expect_err("corrupt goals");

        assert!(matches!(err, OperationError::Refresh(_)));
    }
}
