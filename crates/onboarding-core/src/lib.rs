pub mod error;
mod phase;
pub mod settings;
pub mod types;

pub use error::*;
pub use phase::Phase;
pub use settings::{
    DIRECT_FROM_ONBOARDING_KEY, SETTING_KEY_PREFIX, SelectedGoal, SettingKey, SettingValue,
    SettingsPatch,
};
pub use types::*;
