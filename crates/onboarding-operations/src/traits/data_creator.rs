use async_trait::async_trait;
use onboarding_core::{DomainTemplate, GoalTemplate};
use serde_json::Value;

/// Result reported by the data creator. Failure is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub data: Value,
}

impl CreationOutcome {
    #[must_use]
    pub fn succeeded(data: Value) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: Value::Null,
        }
    }
}

/// Synthesizes and persists the user's first goal with its projects and tasks.
///
/// Created data has no undo at this layer.
#[async_trait]
pub trait OnboardingDataCreator: Send + Sync {
    async fn create_onboarding_data(
        &self,
        domain: &DomainTemplate,
        goal: &GoalTemplate,
    ) -> CreationOutcome;
}
