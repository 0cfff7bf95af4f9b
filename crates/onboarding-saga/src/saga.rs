use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::erased::{CloneableAny, ErasedStep};
use crate::error::{CompensationError, SagaError};
use crate::stack::CompensationStack;

/// A compiled saga ready for execution.
///
/// Sagas execute a sequence of steps, where each step's output becomes the
/// next step's input. If any step fails, previously completed steps are
/// compensated in reverse order (LIFO). Rollback is best-effort: a failing
/// compensation is recorded and the remaining ones still run.
///
/// A saga holds no per-run state, so the same instance can be executed
/// repeatedly. Every execution gets a fresh compensation stack.
pub struct Saga<Input, Output, Ctx, Err> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output)>,
}

impl<Input, Output, Ctx, Err> Saga<Input, Output, Ctx, Err>
where
    Input: Clone + Send + 'static,
    Output: Send + 'static,
    Ctx: Sync,
    Err: Debug + Send,
{
    pub(crate) fn from_steps(steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>) -> Self {
        Self {
            steps,
            _phantom: PhantomData,
        }
    }

    /// Names of the steps in execution order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Execute the saga, returning the final output on success.
    ///
    /// On failure, compensates all previously completed steps in reverse order.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` if a step fails and all compensations succeed.
    /// Returns `SagaError::CompensationFailed` if a step fails and some compensations also fail.
    pub async fn execute(&self, ctx: &Ctx, input: Input) -> Result<Output, SagaError<Err>> {
        let (result, _audit_log) = self.execute_internal(ctx, input).await;
        result
    }

    /// Execute the saga and return both the result and an audit log.
    ///
    /// The audit log tracks all step executions and compensations.
    pub async fn execute_with_audit(
        &self,
        ctx: &Ctx,
        input: Input,
    ) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        self.execute_internal(ctx, input).await
    }

    async fn execute_internal(
        &self,
        ctx: &Ctx,
        input: Input,
    ) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();
        let mut stack = CompensationStack::new();

        let mut current_input: Box<dyn CloneableAny> = Box::new(input);
        let last_index = self.steps.len().saturating_sub(1);

        for (index, step) in self.steps.iter().enumerate() {
            audit_log.record_start(step.name());
            debug!(step = step.name(), index, "executing saga step");

            let outcome = match step.prepare_erased(ctx, current_input).await {
                Ok(prepared) => {
                    let stored_input = prepared.clone_box();
                    step.execute_erased(ctx, prepared)
                        .await
                        .map(|output| (output, stored_input))
                }
                Err(error) => Err(error),
            };

            match outcome {
                Ok((output, stored_input)) => {
                    audit_log.record_success(step.compensation_description());
                    if !stack.push(index, stored_input) {
                        warn!(
                            step = step.name(),
                            "rollback in progress, compensation not registered"
                        );
                    }

                    if index == last_index {
                        let typed_output = output
                            .into_any()
                            .downcast::<Output>()
                            .expect("type-state builder guarantees final output type");
                        return (Ok(*typed_output), audit_log);
                    }

                    current_input = output;
                }
                Err(error) => {
                    audit_log.record_failure();
                    debug!(
                        step = step.name(),
                        registered = stack.len(),
                        "saga step failed, rolling back"
                    );
                    let saga_error = self
                        .compensate(ctx, &mut audit_log, &mut stack, step.name(), error)
                        .await;
                    return (Err(saga_error), audit_log);
                }
            }
        }

        unreachable!("saga must have at least one step")
    }

    async fn compensate(
        &self,
        ctx: &Ctx,
        audit_log: &mut SagaAuditLog,
        stack: &mut CompensationStack,
        failed_step: &str,
        step_error: Err,
    ) -> SagaError<Err> {
        let mut compensation_errors = Vec::new();

        if let Some(entries) = stack.begin_rollback() {
            for (index, stored_input) in entries {
                let step = &self.steps[index];
                let step_name = step.name();
                let description = step.compensation_description();

                if !step.has_compensation() {
                    debug!(step = step_name, "nothing to undo, keeping step effects");
                    audit_log.record_kept(step_name);
                    continue;
                }

                match step.compensate_erased(ctx, stored_input).await {
                    Ok(()) => {
                        debug!(step = step_name, "compensated saga step");
                        audit_log.record_compensated(step_name);
                    }
                    Err(error) => {
                        warn!(
                            step = step_name,
                            compensation = %description,
                            error = ?error,
                            "compensation failed, continuing rollback"
                        );
                        audit_log.record_compensation_failed(step_name);
                        compensation_errors.push(CompensationError {
                            step: step_name.to_string(),
                            description,
                            error,
                        });
                    }
                }
            }
            stack.finish_rollback();
        }

        if compensation_errors.is_empty() {
            SagaError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}
