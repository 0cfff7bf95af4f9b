use onboarding_saga::SagaError;
use thiserror::Error;

/// Errors surfaced by the onboarding transaction and its collaborators.
///
/// Collaborator failures carry their message rather than a boxed source so
/// the same error can be stored in the progress state and returned to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] onboarding_core::CoreError),

    #[error("failed to create onboarding data: {0}")]
    DataCreation(String),

    #[error("key-value store operation on '{key}' failed: {message}")]
    Store { key: String, message: String },

    #[error("failed to update app setting '{key}': {message}")]
    Settings { key: String, message: String },

    #[error("a data refresh function is required to complete onboarding")]
    RefreshRequired,

    #[error("failed to refresh app data: {0}")]
    Refresh(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid onboarding configuration: {0}")]
    Config(String),

    #[error("an onboarding attempt is already in progress")]
    AttemptInFlight,
}

impl OperationError {
    pub(crate) fn store(key: &str, message: impl std::fmt::Display) -> Self {
        Self::Store {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for OperationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A failed saga surfaces the failing step's own error. Compensation
/// failures have already been logged by the saga runner.
impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        err.into_step_error()
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;
