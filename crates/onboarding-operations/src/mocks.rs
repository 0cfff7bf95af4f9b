use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use onboarding_core::{DomainTemplate, GoalTemplate, Phase, SettingKey, SettingValue};
use serde_json::json;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    AppSettingsGateway, CreationOutcome, DataRefreshTrigger, KeyValueStore,
    OnboardingDataCreator, ProgressReporter,
};

/// Ordered record of every collaborator call made during a test.
#[derive(Default)]
pub struct CallJournal {
    entries: Mutex<Vec<String>>,
}

impl CallJournal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().expect("journal lock").push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("journal lock").clone()
    }

    /// Entries that change state, leaving out reads.
    #[must_use]
    pub fn milestones(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| !entry.starts_with("get:") && !entry.starts_with("read_setting:"))
            .collect()
    }
}

pub struct ScriptedStore {
    journal: Arc<CallJournal>,
    items: tokio::sync::Mutex<BTreeMap<String, String>>,
    fail_set: Mutex<HashSet<String>>,
    fail_remove: Mutex<HashSet<String>>,
}

impl ScriptedStore {
    #[must_use]
    pub fn new(journal: Arc<CallJournal>) -> Self {
        Self {
            journal,
            items: tokio::sync::Mutex::new(BTreeMap::new()),
            fail_set: Mutex::new(HashSet::new()),
            fail_remove: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_on_set(&self, key: &str) {
        self.fail_set.lock().expect("lock").insert(key.to_string());
    }

    pub fn fail_on_remove(&self, key: &str) {
        self.fail_remove.lock().expect("lock").insert(key.to_string());
    }

    pub async fn value(&self, key: &str) -> Option<String> {
        self.items.lock().await.get(key).cloned()
    }

    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.items.lock().await.clone()
    }

    async fn put_quiet(&self, key: &str, value: &str) {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    async fn remove_quiet(&self, key: &str) {
        self.items.lock().await.remove(key);
    }
}

#[async_trait]
impl KeyValueStore for ScriptedStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.journal.record(format!("get:{key}"));
        Ok(self.value(key).await)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.journal.record(format!("set:{key}"));
        if self.fail_set.lock().expect("lock").contains(key) {
            return Err(OperationError::store(key, "scripted write failure"));
        }
        self.put_quiet(key, value).await;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.journal.record(format!("remove:{key}"));
        if self.fail_remove.lock().expect("lock").contains(key) {
            return Err(OperationError::store(key, "scripted remove failure"));
        }
        self.remove_quiet(key).await;
        Ok(())
    }
}

/// Gateway that writes through to a [`ScriptedStore`] without journaling
/// the store calls, so the journal shows one entry per setting.
pub struct MockSettingsGateway {
    journal: Arc<CallJournal>,
    store: Arc<ScriptedStore>,
    fail_update: Mutex<HashSet<String>>,
    fail_clear: Mutex<HashSet<String>>,
}

impl MockSettingsGateway {
    #[must_use]
    pub fn new(journal: Arc<CallJournal>, store: Arc<ScriptedStore>) -> Self {
        Self {
            journal,
            store,
            fail_update: Mutex::new(HashSet::new()),
            fail_clear: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_on_update(&self, name: &str) {
        self.fail_update.lock().expect("lock").insert(name.to_string());
    }

    pub fn fail_on_clear(&self, name: &str) {
        self.fail_clear.lock().expect("lock").insert(name.to_string());
    }

    fn failure(key: SettingKey) -> OperationError {
        OperationError::Settings {
            key: key.name().to_string(),
            message: "scripted gateway failure".to_string(),
        }
    }
}

#[async_trait]
impl AppSettingsGateway for MockSettingsGateway {
    async fn app_setting(&self, key: SettingKey) -> Result<Option<SettingValue>> {
        self.journal.record(format!("read_setting:{key}"));
        match self.store.value(&key.storage_key()).await {
            Some(raw) => Ok(Some(key.decode(&raw)?)),
            None => Ok(None),
        }
    }

    async fn update_app_setting(&self, key: SettingKey, value: SettingValue) -> Result<()> {
        self.journal.record(format!("setting:{key}"));
        if self.fail_update.lock().expect("lock").contains(key.name()) {
            return Err(Self::failure(key));
        }
        self.store
            .put_quiet(&key.storage_key(), &value.encode())
            .await;
        Ok(())
    }

    async fn restore_app_setting(&self, key: SettingKey, raw: &str) -> Result<()> {
        self.journal.record(format!("restore_setting:{key}"));
        if self.fail_update.lock().expect("lock").contains(key.name()) {
            return Err(Self::failure(key));
        }
        self.store.put_quiet(&key.storage_key(), raw).await;
        Ok(())
    }

    async fn clear_app_setting(&self, key: SettingKey) -> Result<()> {
        self.journal.record(format!("clear_setting:{key}"));
        if self.fail_clear.lock().expect("lock").contains(key.name()) {
            return Err(Self::failure(key));
        }
        self.store.remove_quiet(&key.storage_key()).await;
        Ok(())
    }
}

pub struct MockDataCreator {
    journal: Arc<CallJournal>,
    failure: Mutex<Option<String>>,
    created: Mutex<usize>,
}

impl MockDataCreator {
    #[must_use]
    pub fn new(journal: Arc<CallJournal>) -> Self {
        Self {
            journal,
            failure: Mutex::new(None),
            created: Mutex::new(0),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().expect("lock") = Some(message.to_string());
    }
}

#[async_trait]
impl OnboardingDataCreator for MockDataCreator {
    async fn create_onboarding_data(
        &self,
        _domain: &DomainTemplate,
        _goal: &GoalTemplate,
    ) -> CreationOutcome {
        self.journal.record("create_data");
        if let Some(message) = self.failure.lock().expect("lock").clone() {
            return CreationOutcome::failed(message);
        }
        let mut created = self.created.lock().expect("lock");
        *created += 1;
        CreationOutcome::succeeded(json!({ "goalId": format!("goal-{created}") }))
    }
}

pub struct MockRefresher {
    journal: Arc<CallJournal>,
    failure: Mutex<Option<String>>,
}

impl MockRefresher {
    #[must_use]
    pub fn new(journal: Arc<CallJournal>) -> Self {
        Self {
            journal,
            failure: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().expect("lock") = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().expect("lock") = None;
    }
}

#[async_trait]
impl DataRefreshTrigger for MockRefresher {
    async fn refresh_data(&self) -> Result<()> {
        self.journal.record("refresh");
        match self.failure.lock().expect("lock").clone() {
            Some(message) => Err(OperationError::Refresh(message)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    reports: Mutex<Vec<(Phase, u8)>>,
}

impl RecordingProgress {
    #[must_use]
    pub fn reports(&self) -> Vec<(Phase, u8)> {
        self.reports.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, phase: Phase, target_percent: u8) {
        self.reports
            .lock()
            .expect("lock")
            .push((phase, target_percent));
    }
}
