mod data_creator;
mod data_refresher;
mod file_store;
mod memory_store;
mod settings_gateway;

pub use data_creator::{GOALS_KEY, GoalRecord, StoreDataCreator};
pub use data_refresher::StoreDataRefresher;
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use settings_gateway::StoreSettingsGateway;
