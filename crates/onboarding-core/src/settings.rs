//! App settings touched by onboarding and their string encoding.
//!
//! Settings live in the key-value store under `appSetting_<name>`. Booleans
//! are stored as `"true"`/`"false"`, text as the raw string, and structured
//! values as JSON. Decoding is driven by the key, so a stored value always
//! round-trips to the same [`SettingValue`] variant it was written from.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{DomainTemplate, GoalTemplate, ProjectTemplate};

pub const SETTING_KEY_PREFIX: &str = "appSetting_";

/// Flag telling the home screen the user just arrived from onboarding.
pub const DIRECT_FROM_ONBOARDING_KEY: &str = "directFromOnboarding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    OnboardingCompleted,
    ThemeColor,
    SelectedDomain,
    SelectedCountry,
    SelectedGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingKind {
    Bool,
    Text,
    Json,
}

impl SettingKey {
    /// Every key written by onboarding, in write order.
    pub const ALL: [SettingKey; 5] = [
        SettingKey::OnboardingCompleted,
        SettingKey::ThemeColor,
        SettingKey::SelectedDomain,
        SettingKey::SelectedCountry,
        SettingKey::SelectedGoal,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OnboardingCompleted => "onboardingCompleted",
            Self::ThemeColor => "themeColor",
            Self::SelectedDomain => "selectedDomain",
            Self::SelectedCountry => "selectedCountry",
            Self::SelectedGoal => "selectedGoal",
        }
    }

    /// Key under which the setting is persisted in the key-value store.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("{SETTING_KEY_PREFIX}{}", self.name())
    }

    fn kind(self) -> SettingKind {
        match self {
            Self::OnboardingCompleted => SettingKind::Bool,
            Self::ThemeColor | Self::SelectedDomain | Self::SelectedCountry => SettingKind::Text,
            Self::SelectedGoal => SettingKind::Json,
        }
    }

    /// Decode a raw stored string into the value type this key holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the raw string is not a valid encoding for this key.
    pub fn decode(self, raw: &str) -> Result<SettingValue> {
        let invalid = |message: String| CoreError::InvalidSettingValue {
            key: self.name().to_string(),
            message,
        };
        match self.kind() {
            SettingKind::Bool => match raw {
                "true" => Ok(SettingValue::Bool(true)),
                "false" => Ok(SettingValue::Bool(false)),
                other => Err(invalid(format!("expected true or false, got '{other}'"))),
            },
            SettingKind::Text => Ok(SettingValue::Text(raw.to_string())),
            SettingKind::Json => serde_json::from_str(raw)
                .map(SettingValue::Json)
                .map_err(|e| invalid(e.to_string())),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix(SETTING_KEY_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| CoreError::UnknownSettingKey(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
    Json(serde_json::Value),
}

impl SettingValue {
    /// String form written to the key-value store.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The goal selection remembered in `selectedGoal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedGoal {
    pub domain: String,
    pub goal_name: String,
    pub projects: Vec<ProjectTemplate>,
}

/// Settings written when onboarding completes, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsPatch {
    entries: IndexMap<SettingKey, SettingValue>,
}

impl SettingsPatch {
    /// Build the completion patch. The theme colour comes from the domain
    /// when it has one, otherwise from `default_theme_color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the goal selection cannot be encoded as JSON.
    pub fn for_onboarding(
        domain: &DomainTemplate,
        goal: &GoalTemplate,
        country: &str,
        default_theme_color: &str,
    ) -> Result<Self> {
        let selected_goal = SelectedGoal {
            domain: domain.name.clone(),
            goal_name: goal.name.clone(),
            projects: goal.projects.clone(),
        };
        let selected_goal =
            serde_json::to_value(&selected_goal).map_err(|e| CoreError::InvalidSettingValue {
                key: SettingKey::SelectedGoal.name().to_string(),
                message: e.to_string(),
            })?;
        let theme_color = domain
            .color
            .clone()
            .unwrap_or_else(|| default_theme_color.to_string());

        let mut entries = IndexMap::new();
        entries.insert(SettingKey::OnboardingCompleted, SettingValue::Bool(true));
        entries.insert(SettingKey::ThemeColor, SettingValue::Text(theme_color));
        entries.insert(
            SettingKey::SelectedDomain,
            SettingValue::Text(domain.name.clone()),
        );
        entries.insert(
            SettingKey::SelectedCountry,
            SettingValue::Text(country.to_string()),
        );
        entries.insert(SettingKey::SelectedGoal, SettingValue::Json(selected_goal));
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = SettingKey> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn get(&self, key: SettingKey) -> Option<&SettingValue> {
        self.entries.get(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
