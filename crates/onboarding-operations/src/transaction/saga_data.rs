use onboarding_core::{DomainTemplate, GoalTemplate, SettingKey, SettingsPatch};
use serde_json::Value;

/// Value a key held before the saga overwrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PreImage {
    Absent,
    Present(String),
}

impl From<Option<String>> for PreImage {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

/// Data threaded through the onboarding saga steps.
#[derive(Debug, Clone)]
pub(crate) struct OnboardingSagaData {
    pub domain: DomainTemplate,
    pub goal: GoalTemplate,
    pub country: String,
    pub created: Option<Value>,
    pub settings_patch: Option<SettingsPatch>,
    pub settings_snapshot: Vec<(SettingKey, PreImage)>,
    pub flag_snapshot: Option<PreImage>,
}

impl OnboardingSagaData {
    pub(crate) fn new(domain: DomainTemplate, goal: GoalTemplate, country: String) -> Self {
        Self {
            domain,
            goal,
            country,
            created: None,
            settings_patch: None,
            settings_snapshot: Vec::new(),
            flag_snapshot: None,
        }
    }
}
