use std::sync::Arc;

use onboarding_core::{DomainTemplate, GoalTemplate};
use onboarding_saga::{Saga, SagaBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::collaborators::OnboardingCollaborators;
use super::context::OnboardingSagaContext;
use super::saga_data::OnboardingSagaData;
use super::saga_steps::{
    CreateDataStep, FinalizeOnboardingStep, RefreshAppContextDataStep, UpdateSettingsStep,
    UpdateStorageFlagsStep,
};
use crate::config::OnboardingConfig;
use crate::error::{OperationError, Result};
use crate::traits::{NoProgress, ProgressReporter};

type OnboardingSaga =
    Saga<OnboardingSagaData, OnboardingSagaData, OnboardingSagaContext, OperationError>;

/// Outcome of a successful onboarding transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SagaResult {
    pub success: bool,
    /// Whatever the data creator returned, passed through untouched.
    pub data: Value,
}

/// Completes onboarding as a single all-or-nothing unit of work over a
/// store without transactions.
///
/// Steps run in a fixed order: create data, update settings, set the
/// `directFromOnboarding` flag, refresh app data, then settle. When a step
/// fails, every earlier step that changed state is undone in reverse order
/// on a best-effort basis, and the failing step's own error is returned.
pub struct OnboardingTransaction {
    collaborators: OnboardingCollaborators,
    config: OnboardingConfig,
    progress: Arc<dyn ProgressReporter>,
}

impl OnboardingTransaction {
    #[must_use]
    pub fn new(collaborators: OnboardingCollaborators, config: OnboardingConfig) -> Self {
        Self {
            collaborators,
            config,
            progress: Arc::new(NoProgress),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Run the onboarding saga. `country` falls back to the configured default.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step, after compensating the
    /// steps that completed before it. Compensation failures are logged and
    /// never replace that error.
    pub async fn execute_transaction(
        &self,
        domain: &DomainTemplate,
        goal: &GoalTemplate,
        country: Option<&str>,
    ) -> Result<SagaResult> {
        let country = country.unwrap_or(self.config.default_country());
        info!(domain = %domain.name, goal = %goal.name, country, "starting onboarding transaction");

        let saga = Self::build_saga();
        let context = OnboardingSagaContext::new(
            self.collaborators.clone(),
            Arc::clone(&self.progress),
            self.config.timing().settle_delay(),
            self.config.default_theme_color().to_string(),
        );
        let data = OnboardingSagaData::new(domain.clone(), goal.clone(), country.to_string());

        let (result, audit_log) = saga.execute_with_audit(&context, data).await;
        debug!(summary = %audit_log.summary(), "onboarding saga audit");

        match result {
            Ok(data) => {
                info!("onboarding transaction completed");
                Ok(SagaResult {
                    success: true,
                    data: data.created.unwrap_or(Value::Null),
                })
            }
            Err(err) => {
                warn!(
                    step = err.failed_step(),
                    compensated = ?audit_log.compensated_steps(),
                    error = %err.step_error(),
                    "onboarding transaction rolled back"
                );
                Err(err.into())
            }
        }
    }

    fn build_saga() -> OnboardingSaga {
        SagaBuilder::new()
            .first_step(CreateDataStep)
            .then(UpdateSettingsStep)
            .then(UpdateStorageFlagsStep)
            .then(RefreshAppContextDataStep)
            .then(FinalizeOnboardingStep)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use onboarding_core::{Phase, ProjectTemplate};
    use onboarding_saga::StepStatus;

    use super::*;
    use crate::mocks::{
        CallJournal, MockDataCreator, MockRefresher, MockSettingsGateway, RecordingProgress,
        ScriptedStore,
    };
    use crate::traits::KeyValueStore;

    fn career() -> (DomainTemplate, GoalTemplate) {
        (
            DomainTemplate::new("Career").with_color("#FF8800"),
            GoalTemplate::new("Get Promoted").with_project(ProjectTemplate::new("Skills")),
        )
    }

    struct Harness {
        journal: Arc<CallJournal>,
        store: Arc<ScriptedStore>,
        creator: Arc<MockDataCreator>,
        gateway: Arc<MockSettingsGateway>,
        refresher: Arc<MockRefresher>,
    }

    impl Harness {
        fn new() -> Self {
            let journal = Arc::new(CallJournal::default());
            let store = Arc::new(ScriptedStore::new(Arc::clone(&journal)));
            Self {
                creator: Arc::new(MockDataCreator::new(Arc::clone(&journal))),
                gateway: Arc::new(MockSettingsGateway::new(
                    Arc::clone(&journal),
                    Arc::clone(&store),
                )),
                refresher: Arc::new(MockRefresher::new(Arc::clone(&journal))),
                store,
                journal,
            }
        }

        fn collaborators(&self) -> OnboardingCollaborators {
            OnboardingCollaborators::new(self.store.clone(), self.creator.clone())
                .with_settings_gateway(self.gateway.clone())
                .with_refresher(self.refresher.clone())
        }

        fn transaction(&self) -> OnboardingTransaction {
            OnboardingTransaction::new(self.collaborators(), OnboardingConfig::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn steps_run_in_order_and_return_creator_data() -> anyhow::Result<()> {
        let harness = Harness::new();
        let (domain, goal) = career();

        let result = harness
            .transaction()
            .execute_transaction(&domain, &goal, Some("new-zealand"))
            .await?;

        assert!(result.success);
        assert_eq!(result.data["goalId"], "goal-1");
        assert_eq!(
            harness.journal.milestones(),
            vec![
                "create_data",
                "setting:onboardingCompleted",
                "setting:themeColor",
                "setting:selectedDomain",
                "setting:selectedCountry",
                "setting:selectedGoal",
                "set:directFromOnboarding",
                "refresh",
            ]
        );
        assert_eq!(
            harness.store.value("appSetting_selectedCountry").await,
            Some("new-zealand".to_string())
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn country_defaults_from_config() -> anyhow::Result<()> {
        let harness = Harness::new();
        let (domain, goal) = career();

        harness
            .transaction()
            .execute_transaction(&domain, &goal, None)
            .await?;

        assert_eq!(
            harness.store.value("appSetting_selectedCountry").await,
            Some("australia".to_string())
        );
        assert_eq!(
            harness.store.value("appSetting_themeColor").await,
            Some("#FF8800".to_string())
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn reports_progress_targets_per_step() -> anyhow::Result<()> {
        let harness = Harness::new();
        let progress = Arc::new(RecordingProgress::default());
        let (domain, goal) = career();

        harness
            .transaction()
            .with_progress(progress.clone())
            .execute_transaction(&domain, &goal, None)
            .await?;

        assert_eq!(
            progress.reports(),
            vec![
                (Phase::CreatingData, 25),
                (Phase::UpdatingSettings, 45),
                (Phase::UpdatingSettings, 60),
                (Phase::RefreshingContext, 75),
                (Phase::PreparingApp, 85),
                (Phase::PreparingApp, 95),
            ]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn settle_delay_holds_the_transaction_open() -> anyhow::Result<()> {
        let harness = Harness::new();
        let (domain, goal) = career();
        let started = tokio::time::Instant::now();

        harness
            .transaction()
            .execute_transaction(&domain, &goal, None)
            .await?;

        assert!(started.elapsed() >= Duration::from_millis(300));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn failed_creation_outcome_stops_before_any_write() {
        let harness = Harness::new();
        harness.creator.fail_with("template store offline");
        let (domain, goal) = career();

        let err = harness
            .transaction()
            .execute_transaction(&domain, &goal, None)
            .await
            .expect_err("creation fails");

        assert_eq!(
            err,
            OperationError::DataCreation("template store offline".to_string())
        );
        assert!(harness.store.snapshot().await.is_empty());
        assert_eq!(harness.journal.milestones(), vec!["create_data"]);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_refresher_rolls_back_settings_and_flag() -> anyhow::Result<()> {
        let harness = Harness::new();
        harness
            .store
            .set_item("appSetting_themeColor", "#123456")
            .await?;
        let collaborators = OnboardingCollaborators::new(
            harness.store.clone(),
            harness.creator.clone(),
        )
        .with_settings_gateway(harness.gateway.clone());
        let (domain, goal) = career();

        let err = OnboardingTransaction::new(collaborators, OnboardingConfig::default())
            .execute_transaction(&domain, &goal, None)
            .await
            .expect_err("refresh is required");

        assert_eq!(err, OperationError::RefreshRequired);
        let remaining = harness.store.snapshot().await;
        assert_eq!(
            remaining.into_iter().collect::<Vec<_>>(),
            vec![("appSetting_themeColor".to_string(), "#123456".to_string())]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rollback_audit_lists_only_steps_that_were_undone() {
        let harness = Harness::new();
        let collaborators = OnboardingCollaborators::new(
            harness.store.clone(),
            harness.creator.clone(),
        );
        let context = OnboardingSagaContext::new(
            collaborators,
            Arc::new(NoProgress),
            Duration::from_millis(300),
            "#4A90E2".to_string(),
        );
        let (domain, goal) = career();
        let data = OnboardingSagaData::new(domain, goal, "australia".to_string());

        let (result, audit_log) = OnboardingTransaction::build_saga()
            .execute_with_audit(&context, data)
            .await;

        assert!(result.is_err());
        assert_eq!(
            audit_log.compensated_steps(),
            vec!["update_storage_flags", "update_settings"]
        );
        assert_eq!(audit_log.records()[0].name, "create_data");
        assert_eq!(audit_log.records()[0].status, StepStatus::Kept);
        assert_eq!(audit_log.failed_step(), Some("refresh_app_context_data"));
    }

    #[tokio::test(start_paused = true)]
    async fn partial_settings_write_is_restored_by_the_step_itself() -> anyhow::Result<()> {
        let harness = Harness::new();
        harness.gateway.fail_on_update("selectedDomain");
        let (domain, goal) = career();

        let err = harness
            .transaction()
            .execute_transaction(&domain, &goal, None)
            .await
            .expect_err("settings write fails");

        assert!(matches!(err, OperationError::Settings { ref key, .. } if key == "selectedDomain"));
        assert!(harness.store.snapshot().await.is_empty());
        assert!(!harness.journal.milestones().contains(&"set:directFromOnboarding".to_string()));
        Ok(())
    }
}
