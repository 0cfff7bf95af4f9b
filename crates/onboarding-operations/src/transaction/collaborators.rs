use std::sync::Arc;

use crate::traits::{AppSettingsGateway, DataRefreshTrigger, KeyValueStore, OnboardingDataCreator};

/// Capabilities the onboarding transaction runs against.
///
/// The settings gateway is optional; without it settings are written to the
/// store directly. The refresher is required for the refresh step to pass,
/// but may be left out to exercise rollback.
#[derive(Clone)]
pub struct OnboardingCollaborators {
    store: Arc<dyn KeyValueStore>,
    data_creator: Arc<dyn OnboardingDataCreator>,
    settings: Option<Arc<dyn AppSettingsGateway>>,
    refresher: Option<Arc<dyn DataRefreshTrigger>>,
}

impl OnboardingCollaborators {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        data_creator: Arc<dyn OnboardingDataCreator>,
    ) -> Self {
        Self {
            store,
            data_creator,
            settings: None,
            refresher: None,
        }
    }

    #[must_use]
    pub fn with_settings_gateway(mut self, settings: Arc<dyn AppSettingsGateway>) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn with_refresher(mut self, refresher: Arc<dyn DataRefreshTrigger>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn data_creator(&self) -> &dyn OnboardingDataCreator {
        self.data_creator.as_ref()
    }

    #[must_use]
    pub fn settings_gateway(&self) -> Option<&dyn AppSettingsGateway> {
        self.settings.as_deref()
    }

    #[must_use]
    pub fn refresher(&self) -> Option<&dyn DataRefreshTrigger> {
        self.refresher.as_deref()
    }
}
