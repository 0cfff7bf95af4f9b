use async_trait::async_trait;

/// A step in a saga that can be executed and compensated.
///
/// Each step transforms an input into an output, with the ability to undo
/// its effects if a later step fails. Before executing, a step may `prepare`
/// its input, typically by capturing the pre-image of everything it is about
/// to overwrite. The prepared input is what gets stored for compensation.
///
/// # Type Parameters
///
/// - `Input`: Data received from the previous step (or saga entry point)
/// - `Output`: Data produced for the next step
/// - `Context`: Shared dependencies (injected, not passed between steps)
/// - `Error`: The error type for step failures
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Data received from the previous step or saga entry point.
    type Input: Clone + Send + 'static;

    /// Data produced for the next step.
    type Output: Clone + Send + 'static;

    /// Shared context providing dependencies.
    type Context: Send + Sync;

    /// Error type for step failures.
    type Error: Send;

    /// Human-readable name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Capture whatever the compensation will need before any mutation.
    ///
    /// Must not mutate external state. The default returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the pre-image cannot be read. The step is then
    /// treated as failed and no compensation is registered for it.
    async fn prepare(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Input, Self::Error> {
        let _ = ctx;
        Ok(input)
    }

    /// Execute the step, transforming the prepared input into output.
    ///
    /// A step that fails after partially mutating state is responsible for
    /// restoring what it already wrote before returning the error.
    ///
    /// # Errors
    ///
    /// Returns an error if the step fails to complete.
    async fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error>;

    /// Compensate (undo) the step's effects.
    ///
    /// Called during rollback when a later step fails. Receives the prepared
    /// input that was passed to `execute()`.
    ///
    /// The default implementation is a no-op, suitable for read-only steps.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails.
    async fn compensate(&self, ctx: &Self::Context, input: Self::Input) -> Result<(), Self::Error> {
        let _ = (ctx, input);
        Ok(())
    }

    /// Whether `compensate` undoes anything.
    ///
    /// Steps returning `false` are skipped during rollback and recorded as
    /// [`StepStatus::Kept`](crate::StepStatus::Kept) rather than compensated.
    fn has_compensation(&self) -> bool {
        true
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
