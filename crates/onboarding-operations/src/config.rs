use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{OperationError, Result};

const MIN_SETTLE_DELAY_MS: u64 = 200;
const MIN_TOTAL_MS: u64 = 2000;
const MIN_COMPLETION_MS: u64 = 500;

/// Timing policy for the saga's settle delay and the progress animation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    settle_delay_ms: u64,
    min_total_ms: u64,
    min_completion_ms: u64,
    processing_ramp_ms: u64,
    step_ramp_ms: u64,
    tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 300,
            min_total_ms: MIN_TOTAL_MS,
            min_completion_ms: MIN_COMPLETION_MS,
            processing_ramp_ms: 200,
            step_ramp_ms: 400,
            tick_ms: 16,
        }
    }
}

impl TimingConfig {
    /// Pause after the last write so downstream listeners observe it.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Minimum wall-clock time from attempt start until `Completed`.
    #[must_use]
    pub fn min_total(&self) -> Duration {
        Duration::from_millis(self.min_total_ms)
    }

    /// Shortest ramp to 100%, applied even when the total floor has passed.
    #[must_use]
    pub fn min_completion(&self) -> Duration {
        Duration::from_millis(self.min_completion_ms)
    }

    #[must_use]
    pub fn processing_ramp(&self) -> Duration {
        Duration::from_millis(self.processing_ramp_ms)
    }

    #[must_use]
    pub fn step_ramp(&self) -> Duration {
        Duration::from_millis(self.step_ramp_ms)
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.settle_delay_ms < MIN_SETTLE_DELAY_MS {
            return Err(OperationError::Config(format!(
                "timing.settle_delay_ms must be at least {MIN_SETTLE_DELAY_MS}"
            )));
        }
        if self.min_total_ms < MIN_TOTAL_MS {
            return Err(OperationError::Config(format!(
                "timing.min_total_ms must be at least {MIN_TOTAL_MS}"
            )));
        }
        if self.min_completion_ms < MIN_COMPLETION_MS {
            return Err(OperationError::Config(format!(
                "timing.min_completion_ms must be at least {MIN_COMPLETION_MS}"
            )));
        }
        if self.tick_ms == 0 {
            return Err(OperationError::Config(
                "timing.tick_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Onboarding configuration, usually read from an `onboarding.toml`:
///
/// ```toml
/// default_country = "australia"
/// default_theme_color = "#4A90E2"
///
/// [timing]
/// settle_delay_ms = 300
/// ```
///
/// Every field is optional and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OnboardingConfig {
    default_country: String,
    default_theme_color: String,
    timing: TimingConfig,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            default_country: String::from("australia"),
            default_theme_color: String::from("#4A90E2"),
            timing: TimingConfig::default(),
        }
    }
}

impl OnboardingConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML, has unknown keys,
    /// or sets a timing below its floor.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| OperationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            OperationError::Config(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// # Errors
    ///
    /// Returns an error if a timing value is below its floor.
    pub fn validate(&self) -> Result<()> {
        self.timing.validate()
    }

    #[must_use]
    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    #[must_use]
    pub fn default_theme_color(&self) -> &str {
        &self.default_theme_color
    }

    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }
}
