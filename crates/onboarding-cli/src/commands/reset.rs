use clap::Args;
use onboarding_core::{DIRECT_FROM_ONBOARDING_KEY, SettingKey};
use onboarding_operations::providers::GOALS_KEY;
use tracing::debug;

use super::CommandContext;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct ResetArgs {
    /// Also delete goals created by earlier onboarding runs
    #[arg(long)]
    goals: bool,
}

pub(crate) async fn run(context: &CommandContext, args: &ResetArgs) -> Result<()> {
    let store = context.store();

    let mut keys: Vec<String> = SettingKey::ALL
        .into_iter()
        .map(SettingKey::storage_key)
        .collect();
    keys.push(DIRECT_FROM_ONBOARDING_KEY.to_string());
    if args.goals {
        keys.push(GOALS_KEY.to_string());
    }

    let mut removed = 0;
    for key in &keys {
        if store.get_item(key).await.map_err(CliError::Store)?.is_some() {
            store.remove_item(key).await.map_err(CliError::Store)?;
            debug!(key = %key, "removed onboarding key");
            removed += 1;
        }
    }

    println!("Removed {removed} onboarding key(s).");
    Ok(())
}
