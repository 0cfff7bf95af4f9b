use async_trait::async_trait;
use onboarding_core::{DIRECT_FROM_ONBOARDING_KEY, Phase, SettingKey, SettingValue, SettingsPatch};
use onboarding_saga::SagaStep;
use tracing::{debug, warn};

use super::context::OnboardingSagaContext;
use super::saga_data::{OnboardingSagaData, PreImage};
use crate::error::{OperationError, Result};

const UNKNOWN_CREATION_FAILURE: &str = "data creation reported failure without a message";

pub(crate) struct CreateDataStep;

#[async_trait]
impl SagaStep for CreateDataStep {
    type Input = OnboardingSagaData;
    type Output = OnboardingSagaData;
    type Context = OnboardingSagaContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "create_data"
    }

    async fn execute(&self, ctx: &Self::Context, mut input: Self::Input) -> Result<Self::Output> {
        ctx.progress().report(Phase::CreatingData, 25);

        let outcome = ctx
            .data_creator()
            .create_onboarding_data(&input.domain, &input.goal)
            .await;
        if !outcome.success {
            let message = outcome
                .message
                .unwrap_or_else(|| UNKNOWN_CREATION_FAILURE.to_string());
            return Err(OperationError::DataCreation(message));
        }

        debug!(domain = %input.domain.name, goal = %input.goal.name, "created onboarding data");
        input.created = Some(outcome.data);
        Ok(input)
    }

    fn has_compensation(&self) -> bool {
        false
    }

    fn compensation_description(&self) -> String {
        "nothing to undo, created data is kept".to_string()
    }
}

pub(crate) struct UpdateSettingsStep;

#[async_trait]
impl SagaStep for UpdateSettingsStep {
    type Input = OnboardingSagaData;
    type Output = OnboardingSagaData;
    type Context = OnboardingSagaContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "update_settings"
    }

    async fn prepare(&self, ctx: &Self::Context, mut input: Self::Input) -> Result<Self::Input> {
        let patch = build_patch(ctx, &input)?;
        let mut snapshot = Vec::with_capacity(patch.len());
        for key in patch.keys() {
            snapshot.push((key, read_setting(ctx, key).await?));
        }

        input.settings_patch = Some(patch);
        input.settings_snapshot = snapshot;
        Ok(input)
    }

    async fn execute(&self, ctx: &Self::Context, input: Self::Input) -> Result<Self::Output> {
        ctx.progress().report(Phase::UpdatingSettings, 45);

        let patch = match &input.settings_patch {
            Some(patch) => patch.clone(),
            None => build_patch(ctx, &input)?,
        };
        let via_gateway = ctx.settings_gateway().is_some();

        for (written, (key, value)) in patch.iter().enumerate() {
            if let Err(err) = write_setting(ctx, key, value).await {
                debug!(setting = %key, written, "settings write failed, restoring earlier writes");
                let partial = &input.settings_snapshot[..written.min(input.settings_snapshot.len())];
                if let Err(restore_err) = restore_settings(ctx, partial).await {
                    warn!(error = %restore_err, "could not fully restore partially written settings");
                }
                return Err(err);
            }
            debug!(setting = %key, via_gateway, "wrote app setting");
        }

        Ok(input)
    }

    async fn compensate(&self, ctx: &Self::Context, input: Self::Input) -> Result<()> {
        debug!(
            count = input.settings_snapshot.len(),
            "restoring app settings"
        );
        restore_settings(ctx, &input.settings_snapshot).await
    }

    fn compensation_description(&self) -> String {
        "restore previous app settings".to_string()
    }
}

pub(crate) struct UpdateStorageFlagsStep;

#[async_trait]
impl SagaStep for UpdateStorageFlagsStep {
    type Input = OnboardingSagaData;
    type Output = OnboardingSagaData;
    type Context = OnboardingSagaContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "update_storage_flags"
    }

    async fn prepare(&self, ctx: &Self::Context, mut input: Self::Input) -> Result<Self::Input> {
        let previous = ctx.store().get_item(DIRECT_FROM_ONBOARDING_KEY).await?;
        input.flag_snapshot = Some(previous.into());
        Ok(input)
    }

    async fn execute(&self, ctx: &Self::Context, input: Self::Input) -> Result<Self::Output> {
        ctx.progress().report(Phase::UpdatingSettings, 60);

        ctx.store()
            .set_item(DIRECT_FROM_ONBOARDING_KEY, "true")
            .await?;
        debug!(key = DIRECT_FROM_ONBOARDING_KEY, "set storage flag");
        Ok(input)
    }

    async fn compensate(&self, ctx: &Self::Context, input: Self::Input) -> Result<()> {
        let store = ctx.store();
        match input.flag_snapshot {
            Some(PreImage::Present(previous)) => {
                debug!(key = DIRECT_FROM_ONBOARDING_KEY, "restoring storage flag");
                store.set_item(DIRECT_FROM_ONBOARDING_KEY, &previous).await
            }
            Some(PreImage::Absent) => {
                debug!(key = DIRECT_FROM_ONBOARDING_KEY, "removing storage flag");
                store.remove_item(DIRECT_FROM_ONBOARDING_KEY).await
            }
            None => Ok(()),
        }
    }

    fn compensation_description(&self) -> String {
        format!("restore or remove '{DIRECT_FROM_ONBOARDING_KEY}'")
    }
}

pub(crate) struct RefreshAppContextDataStep;

#[async_trait]
impl SagaStep for RefreshAppContextDataStep {
    type Input = OnboardingSagaData;
    type Output = OnboardingSagaData;
    type Context = OnboardingSagaContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "refresh_app_context_data"
    }

    async fn execute(&self, ctx: &Self::Context, input: Self::Input) -> Result<Self::Output> {
        ctx.progress().report(Phase::RefreshingContext, 75);

        let refresher = ctx.refresher().ok_or(OperationError::RefreshRequired)?;
        refresher.refresh_data().await?;
        debug!("refreshed app context data");
        Ok(input)
    }

    fn has_compensation(&self) -> bool {
        false
    }

    fn compensation_description(&self) -> String {
        "nothing to undo, refresh is read-only".to_string()
    }
}

pub(crate) struct FinalizeOnboardingStep;

#[async_trait]
impl SagaStep for FinalizeOnboardingStep {
    type Input = OnboardingSagaData;
    type Output = OnboardingSagaData;
    type Context = OnboardingSagaContext;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "finalize_onboarding"
    }

    async fn execute(&self, ctx: &Self::Context, input: Self::Input) -> Result<Self::Output> {
        ctx.progress().report(Phase::PreparingApp, 85);
        tokio::time::sleep(ctx.settle_delay()).await;
        ctx.progress().report(Phase::PreparingApp, 95);
        Ok(input)
    }

    fn has_compensation(&self) -> bool {
        false
    }

    fn compensation_description(&self) -> String {
        "nothing to undo".to_string()
    }
}

fn build_patch(ctx: &OnboardingSagaContext, input: &OnboardingSagaData) -> Result<SettingsPatch> {
    Ok(SettingsPatch::for_onboarding(
        &input.domain,
        &input.goal,
        &input.country,
        ctx.default_theme_color(),
    )?)
}

/// Pre-images are the raw stored strings on both paths, so a value that does
/// not decode for its key is still captured and restored byte for byte.
async fn read_setting(ctx: &OnboardingSagaContext, key: SettingKey) -> Result<PreImage> {
    let raw = ctx.store().get_item(&key.storage_key()).await?;
    Ok(raw.into())
}

async fn write_setting(
    ctx: &OnboardingSagaContext,
    key: SettingKey,
    value: &SettingValue,
) -> Result<()> {
    match ctx.settings_gateway() {
        Some(gateway) => gateway.update_app_setting(key, value.clone()).await,
        None => {
            ctx.store()
                .set_item(&key.storage_key(), &value.encode())
                .await
        }
    }
}

async fn restore_setting(
    ctx: &OnboardingSagaContext,
    key: SettingKey,
    previous: &PreImage,
) -> Result<()> {
    match (ctx.settings_gateway(), previous) {
        (Some(gateway), PreImage::Present(raw)) => gateway.restore_app_setting(key, raw).await,
        (Some(gateway), PreImage::Absent) => gateway.clear_app_setting(key).await,
        (None, PreImage::Present(raw)) => ctx.store().set_item(&key.storage_key(), raw).await,
        (None, PreImage::Absent) => ctx.store().remove_item(&key.storage_key()).await,
    }
}

/// Restore every key in reverse write order, continuing past failures.
/// Returns the first failure encountered.
async fn restore_settings(
    ctx: &OnboardingSagaContext,
    snapshot: &[(SettingKey, PreImage)],
) -> Result<()> {
    let mut first_error = None;
    for (key, previous) in snapshot.iter().rev() {
        if let Err(err) = restore_setting(ctx, *key, previous).await {
            warn!(setting = %key, error = %err, "failed to restore app setting");
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
