mod data_creator;
mod data_refresher;
mod key_value_store;
mod progress_reporter;
mod settings_gateway;

pub use data_creator::{CreationOutcome, OnboardingDataCreator};
pub use data_refresher::DataRefreshTrigger;
pub use key_value_store::KeyValueStore;
pub use progress_reporter::{NoProgress, ProgressReporter};
pub use settings_gateway::AppSettingsGateway;
