use std::path::PathBuf;

use onboarding_operations::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("onboarding failed")]
    Onboarding(#[from] OperationError),

    #[error("failed to load configuration from '{path}'")]
    Config {
        path: PathBuf,
        #[source]
        source: OperationError,
    },

    #[error("failed to access the onboarding store")]
    Store(#[source] OperationError),

    #[error("progress reporter stopped unexpectedly")]
    ProgressTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CliError>;
