//! Onboarding completion: a compensating saga over a non-transactional
//! key-value store, and the progress state machine that drives it.

mod config;
mod error;
pub mod progress;
pub mod providers;
pub mod traits;
pub mod transaction;

#[cfg(test)]
pub mod mocks;

pub use config::{OnboardingConfig, TimingConfig};
pub use error::{OperationError, Result};
pub use progress::{OnboardingProgressMachine, ProgressState};
pub use transaction::{OnboardingCollaborators, OnboardingTransaction, SagaResult};
