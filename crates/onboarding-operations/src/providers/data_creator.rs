use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use onboarding_core::{DomainTemplate, GoalTemplate, ProjectTemplate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::Result;
use crate::traits::{CreationOutcome, KeyValueStore, OnboardingDataCreator};

/// Store key holding the JSON list of goal records.
pub const GOALS_KEY: &str = "goals";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub id: Uuid,
    pub domain: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub projects: Vec<ProjectTemplate>,
    pub created_at: DateTime<Utc>,
}

pub(crate) async fn load_goals(store: &dyn KeyValueStore) -> Result<Vec<GoalRecord>> {
    match store.get_item(GOALS_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Persists the onboarding goal as a record appended to [`GOALS_KEY`].
pub struct StoreDataCreator {
    store: Arc<dyn KeyValueStore>,
}

impl StoreDataCreator {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn append_goal(&self, domain: &DomainTemplate, goal: &GoalTemplate) -> Result<Uuid> {
        domain.validate()?;
        goal.validate()?;

        let mut goals = load_goals(self.store.as_ref()).await?;
        let record = GoalRecord {
            id: Uuid::new_v4(),
            domain: domain.name.clone(),
            name: goal.name.clone(),
            description: goal.description.clone(),
            projects: goal.projects.clone(),
            created_at: Utc::now(),
        };
        let id = record.id;
        goals.push(record);

        self.store
            .set_item(GOALS_KEY, &serde_json::to_string(&goals)?)
            .await?;
        debug!(goal_id = %id, total = goals.len(), "stored onboarding goal");
        Ok(id)
    }
}

#[async_trait]
impl OnboardingDataCreator for StoreDataCreator {
    async fn create_onboarding_data(
        &self,
        domain: &DomainTemplate,
        goal: &GoalTemplate,
    ) -> CreationOutcome {
        match self.append_goal(domain, goal).await {
            Ok(id) => CreationOutcome::succeeded(json!({ "goalId": id })),
            Err(err) => CreationOutcome::failed(err.to_string()),
        }
    }
}
