use std::sync::Arc;

use clap::Args;
use onboarding_core::{DomainTemplate, GoalTemplate, Phase, ProjectTemplate};
use onboarding_operations::providers::{StoreDataCreator, StoreDataRefresher, StoreSettingsGateway};
use onboarding_operations::{OnboardingCollaborators, OnboardingProgressMachine, ProgressState};
use tokio::sync::watch;

use super::CommandContext;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct RunArgs {
    /// Life domain, e.g. "Career"
    #[arg(long)]
    domain: String,

    /// Name of the first goal
    #[arg(long)]
    goal: String,

    /// Starter project for the goal (repeatable)
    #[arg(long = "project", value_name = "NAME")]
    projects: Vec<String>,

    /// Country code (default from configuration)
    #[arg(long)]
    country: Option<String>,

    /// Theme colour for the domain, e.g. "#4A90E2"
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Write settings straight to the store instead of through the settings gateway
    #[arg(long)]
    direct_settings: bool,

    /// Leave out the data refresher; the attempt fails and rolls back
    #[arg(long)]
    skip_refresh: bool,
}

impl RunArgs {
    fn templates(&self) -> (DomainTemplate, GoalTemplate) {
        let mut domain = DomainTemplate::new(&self.domain);
        if let Some(color) = &self.color {
            domain = domain.with_color(color);
        }
        let goal = self
            .projects
            .iter()
            .fold(GoalTemplate::new(&self.goal), |goal, name| {
                goal.with_project(ProjectTemplate::new(name))
            });
        (domain, goal)
    }
}

pub(crate) async fn run(context: &CommandContext, args: RunArgs) -> Result<()> {
    let store = context.store();
    let mut collaborators =
        OnboardingCollaborators::new(store.clone(), Arc::new(StoreDataCreator::new(store.clone())));
    if !args.direct_settings {
        collaborators =
            collaborators.with_settings_gateway(Arc::new(StoreSettingsGateway::new(store.clone())));
    }
    if !args.skip_refresh {
        collaborators = collaborators.with_refresher(Arc::new(StoreDataRefresher::new(store)));
    }

    let machine = OnboardingProgressMachine::new(collaborators, context.config().clone());
    let printer = tokio::spawn(print_progress(machine.subscribe()));

    let (domain, goal) = args.templates();
    let outcome = machine
        .complete_onboarding(&domain, &goal, args.country.as_deref())
        .await;
    printer.await?;

    let result = outcome?;
    match result.data.get("goalId").and_then(serde_json::Value::as_str) {
        Some(goal_id) => println!("Onboarding complete (goal {goal_id})."),
        None => println!("Onboarding complete."),
    }
    Ok(())
}

/// Print one line per phase until the attempt ends.
async fn print_progress(mut rx: watch::Receiver<ProgressState>) {
    let mut last_phase = Phase::Idle;
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        if state.phase != last_phase {
            println!("[{:>3}%] {}", state.percent, state.phase);
            last_phase = state.phase;
        }
        if state.phase.is_terminal() {
            break;
        }
    }
}
