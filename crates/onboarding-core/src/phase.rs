use std::fmt;

use serde::{Deserialize, Serialize};

/// Phases of an onboarding completion attempt.
///
/// A successful attempt walks `Idle → Processing → CreatingData →
/// UpdatingSettings → RefreshingContext → PreparingApp → Completed`. Any
/// non-terminal phase may fall into `Error`, and `reset` returns to `Idle`
/// from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Processing,
    CreatingData,
    UpdatingSettings,
    RefreshingContext,
    PreparingApp,
    Completed,
    Error,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// True for the in-flight phases between `Idle` and a terminal phase.
    #[must_use]
    pub fn is_processing(self) -> bool {
        !matches!(self, Self::Idle | Self::Completed | Self::Error)
    }

    /// Whether a progress report for `target` is valid while in `self`.
    ///
    /// Reports may re-target the current phase or skip forward along the
    /// success path; they never move backwards. A new attempt may start
    /// (`Processing`) from `Idle` or from a terminal phase.
    #[must_use]
    pub fn can_transition_to(self, target: Phase) -> bool {
        match target {
            Self::Idle => true,
            Self::Processing => matches!(
                self,
                Self::Idle | Self::Processing | Self::Completed | Self::Error
            ),
            Self::Error => self.is_processing(),
            _ => self.is_processing() && target >= self,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::CreatingData => "creating_data",
            Self::UpdatingSettings => "updating_settings",
            Self::RefreshingContext => "refreshing_context",
            Self::PreparingApp => "preparing_app",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}
