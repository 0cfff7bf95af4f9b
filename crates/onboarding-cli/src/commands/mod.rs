mod reset;
mod run;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use onboarding_operations::OnboardingConfig;
use onboarding_operations::providers::JsonFileStore;
use onboarding_operations::traits::KeyValueStore;

use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Complete onboarding for a domain and first goal
    Run(run::RunArgs),
    /// Show the persisted onboarding state
    Status,
    /// Remove the persisted onboarding state
    Reset(reset::ResetArgs),
}

impl Commands {
    pub(crate) async fn execute(self, context: &CommandContext) -> Result<()> {
        match self {
            Self::Run(args) => run::run(context, args).await,
            Self::Status => status::run(context).await,
            Self::Reset(args) => reset::run(context, &args).await,
        }
    }
}

/// Resources shared by every command.
pub(crate) struct CommandContext {
    store: Arc<JsonFileStore>,
    config: OnboardingConfig,
}

impl CommandContext {
    pub(crate) async fn load(store: PathBuf, config: Option<PathBuf>) -> Result<Self> {
        let config = match config {
            Some(path) => OnboardingConfig::load(&path)
                .await
                .map_err(|source| CliError::Config { path, source })?,
            None => OnboardingConfig::default(),
        };
        Ok(Self {
            store: Arc::new(JsonFileStore::new(store)),
            config,
        })
    }

    pub(crate) fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub(crate) fn config(&self) -> &OnboardingConfig {
        &self.config
    }
}
