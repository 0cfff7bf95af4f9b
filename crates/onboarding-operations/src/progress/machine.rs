use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use onboarding_core::{DomainTemplate, GoalTemplate, Phase};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::animator::ProgressAnimator;
use crate::config::{OnboardingConfig, TimingConfig};
use crate::error::{OperationError, Result};
use crate::traits::ProgressReporter;
use crate::transaction::{OnboardingCollaborators, OnboardingTransaction, SagaResult};

/// Observable state of the onboarding progress screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub phase: Phase,
    pub percent: u8,
    pub error: Option<OperationError>,
}

struct MachineShared {
    state: Arc<watch::Sender<ProgressState>>,
    animator: ProgressAnimator,
    timing: TimingConfig,
    attempt: AtomicU64,
    started_at: Mutex<Option<Instant>>,
}

impl MachineShared {
    fn is_current(&self, attempt: u64) -> bool {
        self.attempt.load(Ordering::SeqCst) == attempt
    }

    fn report(&self, attempt: u64, phase: Phase, target: u8) {
        if !self.is_current(attempt) {
            debug!(attempt, %phase, "ignoring report from a superseded attempt");
            return;
        }
        if matches!(phase, Phase::Idle | Phase::Completed | Phase::Error) {
            warn!(%phase, "terminal phases are not reportable, ignoring");
            return;
        }

        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if !state.phase.can_transition_to(phase) {
                warn!(from = %state.phase, to = %phase, "ignoring backwards progress report");
                return false;
            }
            accepted = true;
            if phase == Phase::Processing {
                state.phase = phase;
                state.percent = 0;
                state.error = None;
                return true;
            }
            let changed = state.phase != phase;
            state.phase = phase;
            changed
        });
        if !accepted {
            return;
        }

        if phase == Phase::Processing {
            self.animator.jump_to(0);
            self.animator
                .animate_to(target, self.timing.processing_ramp());
        } else {
            let target = target.max(self.animator.current());
            self.animator.animate_to(target, self.timing.step_ramp());
        }
        debug!(%phase, target, "progress report");
    }

    fn elapsed(&self) -> Duration {
        let started = *self
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        started.map_or(Duration::ZERO, |started| started.elapsed())
    }
}

/// Forwards step reports to the machine for one attempt only.
struct AttemptReporter {
    shared: Arc<MachineShared>,
    attempt: u64,
}

impl ProgressReporter for AttemptReporter {
    fn report(&self, phase: Phase, target_percent: u8) {
        self.shared.report(self.attempt, phase, target_percent);
    }
}

/// Releases the in-flight flag when an attempt ends or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives the onboarding progress screen around one transaction per attempt.
///
/// Phases follow `Idle → Processing → CreatingData → UpdatingSettings →
/// RefreshingContext → PreparingApp → Completed`, with `Error` reachable
/// from any in-flight phase. The percentage is animated toward per-phase
/// targets and only reaches 100 when the attempt completes, never sooner
/// than the configured minimum total duration.
pub struct OnboardingProgressMachine {
    shared: Arc<MachineShared>,
    collaborators: OnboardingCollaborators,
    config: OnboardingConfig,
    in_flight: AtomicBool,
}

impl OnboardingProgressMachine {
    #[must_use]
    pub fn new(collaborators: OnboardingCollaborators, config: OnboardingConfig) -> Self {
        let state = Arc::new(watch::Sender::new(ProgressState::default()));
        let sink_state = Arc::clone(&state);
        let animator = ProgressAnimator::new(config.timing().tick(), move |percent| {
            sink_state.send_if_modified(|state| {
                let animating = state.phase.is_processing() || state.phase == Phase::Error;
                if !animating || state.percent == percent {
                    return false;
                }
                state.percent = percent;
                true
            });
        });

        Self {
            shared: Arc::new(MachineShared {
                state,
                animator,
                timing: config.timing().clone(),
                attempt: AtomicU64::new(0),
                started_at: Mutex::new(None),
            }),
            collaborators,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one onboarding attempt, driving phases and progress as it goes.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::AttemptInFlight`] if another attempt is
    /// still running, otherwise the transaction's error. The same error is
    /// stored in the progress state.
    pub async fn complete_onboarding(
        &self,
        domain: &DomainTemplate,
        goal: &GoalTemplate,
        country: Option<&str>,
    ) -> Result<SagaResult> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(OperationError::AttemptInFlight);
        }
        let _in_flight = InFlight(&self.in_flight);

        let attempt = self.shared.attempt.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .shared
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        info!(attempt, domain = %domain.name, goal = %goal.name, "onboarding attempt started");

        let reporter = Arc::new(AttemptReporter {
            shared: Arc::clone(&self.shared),
            attempt,
        });
        reporter.report(Phase::Processing, 10);

        let transaction =
            OnboardingTransaction::new(self.collaborators.clone(), self.config.clone())
                .with_progress(reporter);

        match transaction.execute_transaction(domain, goal, country).await {
            Ok(result) => {
                self.finish(attempt).await;
                Ok(result)
            }
            Err(err) => {
                self.fail(attempt, &err);
                Err(err)
            }
        }
    }

    async fn finish(&self, attempt: u64) {
        if !self.shared.is_current(attempt) {
            return;
        }
        let timing = &self.shared.timing;
        let ramp = timing
            .min_total()
            .saturating_sub(self.shared.elapsed())
            .max(timing.min_completion());

        // 100 is published together with the Completed phase.
        self.shared.animator.animate_to(99, ramp);
        tokio::time::sleep(ramp).await;

        if !self.shared.is_current(attempt) {
            return;
        }
        self.shared.animator.cancel();
        let shared = &self.shared;
        shared.state.send_if_modified(|state| {
            if !shared.is_current(attempt) {
                return false;
            }
            state.phase = Phase::Completed;
            state.percent = 100;
            true
        });
        info!(attempt, "onboarding attempt completed");
    }

    fn fail(&self, attempt: u64, err: &OperationError) {
        if !self.shared.is_current(attempt) {
            return;
        }
        let shared = &self.shared;
        let moved = shared.state.send_if_modified(|state| {
            if !shared.is_current(attempt) {
                return false;
            }
            state.phase = Phase::Error;
            state.error = Some(err.clone());
            true
        });
        if moved {
            self.shared
                .animator
                .animate_to(0, self.shared.timing.step_ramp());
            warn!(attempt, error = %err, "onboarding attempt failed");
        }
    }

    /// Return to `Idle` with zero progress and no error.
    ///
    /// Any attempt still running keeps running, but its reports and its
    /// outcome no longer touch the state.
    pub fn reset(&self) {
        self.shared.attempt.fetch_add(1, Ordering::SeqCst);
        self.shared.animator.cancel();
        self.shared.state.send_if_modified(|state| {
            let changed = *state != ProgressState::default();
            *state = ProgressState::default();
            changed
        });
        debug!("onboarding progress reset");
    }

    /// Stop the progress animation, leaving phase and percent as they are.
    pub fn cleanup(&self) {
        self.shared.animator.cancel();
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> ProgressState {
        self.shared.state.borrow().clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().phase
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.phase().is_processing()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase() == Phase::Completed
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.phase() == Phase::Error
    }
}

impl Drop for OnboardingProgressMachine {
    fn drop(&mut self) {
        self.cleanup();
    }
}
