use onboarding_core::{DIRECT_FROM_ONBOARDING_KEY, SettingKey};
use onboarding_operations::providers::GOALS_KEY;

use super::CommandContext;
use crate::error::{CliError, Result};

pub(crate) async fn run(context: &CommandContext) -> Result<()> {
    let store = context.store();

    for key in SettingKey::ALL {
        let storage_key = key.storage_key();
        let value = store
            .get_item(&storage_key)
            .await
            .map_err(CliError::Store)?;
        print_entry(&storage_key, value.as_deref());
    }
    let flag = store
        .get_item(DIRECT_FROM_ONBOARDING_KEY)
        .await
        .map_err(CliError::Store)?;
    print_entry(DIRECT_FROM_ONBOARDING_KEY, flag.as_deref());

    let goals = store
        .get_item(GOALS_KEY)
        .await
        .map_err(CliError::Store)?
        .and_then(|raw| serde_json::from_str::<Vec<serde_json::Value>>(&raw).ok())
        .map_or(0, |goals| goals.len());
    println!("goals: {goals}");

    Ok(())
}

fn print_entry(key: &str, value: Option<&str>) {
    println!("{key} = {}", value.unwrap_or("<unset>"));
}
