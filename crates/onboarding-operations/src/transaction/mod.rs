mod collaborators;
mod context;
mod saga_data;
mod saga_steps;
mod operation;

pub use collaborators::OnboardingCollaborators;
pub use operation::{OnboardingTransaction, SagaResult};
