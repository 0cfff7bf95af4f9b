use std::sync::Arc;
use std::time::Duration;

use super::collaborators::OnboardingCollaborators;
use crate::traits::{
    AppSettingsGateway, DataRefreshTrigger, KeyValueStore, OnboardingDataCreator,
    ProgressReporter,
};

pub(crate) struct OnboardingSagaContext {
    collaborators: OnboardingCollaborators,
    progress: Arc<dyn ProgressReporter>,
    settle_delay: Duration,
    default_theme_color: String,
}

impl OnboardingSagaContext {
    pub(crate) fn new(
        collaborators: OnboardingCollaborators,
        progress: Arc<dyn ProgressReporter>,
        settle_delay: Duration,
        default_theme_color: String,
    ) -> Self {
        Self {
            collaborators,
            progress,
            settle_delay,
            default_theme_color,
        }
    }

    pub(crate) fn store(&self) -> &dyn KeyValueStore {
        self.collaborators.store()
    }

    pub(crate) fn data_creator(&self) -> &dyn OnboardingDataCreator {
        self.collaborators.data_creator()
    }

    pub(crate) fn settings_gateway(&self) -> Option<&dyn AppSettingsGateway> {
        self.collaborators.settings_gateway()
    }

    pub(crate) fn refresher(&self) -> Option<&dyn DataRefreshTrigger> {
        self.collaborators.refresher()
    }

    pub(crate) fn progress(&self) -> &dyn ProgressReporter {
        self.progress.as_ref()
    }

    pub(crate) fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub(crate) fn default_theme_color(&self) -> &str {
        &self.default_theme_color
    }
}
