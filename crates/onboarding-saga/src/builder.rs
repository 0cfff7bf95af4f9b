use std::fmt::Debug;
use std::marker::PhantomData;

use crate::erased::{ErasedStep, StepWrapper};
use crate::saga::Saga;
use crate::step::SagaStep;

/// Marker type for a builder with no steps.
pub struct Empty;

/// Marker type for a builder with at least one step.
pub struct HasSteps<LastOutput>(PhantomData<LastOutput>);

/// Type-state builder for constructing type-safe sagas.
///
/// The builder enforces at compile-time that:
/// - Each step's input type matches the previous step's output type
/// - The saga's input type matches the first step's input
/// - The saga's output type matches the last step's output
///
/// Steps run in the order they are added, so reordering or inserting a step
/// is a change to the builder chain only.
///
/// An empty saga (without calling `first_step()`) cannot be built:
///
/// ```compile_fail
/// use onboarding_saga::SagaBuilder;
///
/// // `build()` is only available after `first_step()`
/// let saga = SagaBuilder::<(), (), (), ()>::new().build();
/// ```
pub struct SagaBuilder<Input, Output, Ctx, Err, State> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output, State)>,
}

impl<Ctx, Err> SagaBuilder<(), (), Ctx, Err, Empty> {
    /// Create a new saga builder in the empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Add the first step to the saga.
    ///
    /// This establishes the saga's input type from the step's input type.
    #[must_use]
    pub fn first_step<S>(
        self,
        step: S,
    ) -> SagaBuilder<S::Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(StepWrapper::new(step)));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }
}

impl<Ctx, Err> Default for SagaBuilder<(), (), Ctx, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Input, CurrentOutput, Ctx, Err>
    SagaBuilder<Input, CurrentOutput, Ctx, Err, HasSteps<CurrentOutput>>
{
    /// Add another step to the saga.
    ///
    /// The step's input type must match the current output type.
    #[must_use]
    pub fn then<S>(self, step: S) -> SagaBuilder<Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Input = CurrentOutput, Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(StepWrapper::new(step)));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }

    /// Build the saga from the accumulated steps.
    #[must_use]
    pub fn build(self) -> Saga<Input, CurrentOutput, Ctx, Err>
    where
        Input: Clone + Send + 'static,
        CurrentOutput: Send + 'static,
        Ctx: Sync,
        Err: Debug + Send,
    {
        Saga::from_steps(self.steps)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct TestContext;

    #[derive(Debug, PartialEq)]
    struct TestError(String);

    struct ParseFlag;

    #[async_trait]
    impl SagaStep for ParseFlag {
        type Input = String;
        type Output = bool;
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "parse_flag"
        }

        async fn execute(
            &self,
            _ctx: &Self::Context,
            input: Self::Input,
        ) -> Result<Self::Output, Self::Error> {
            input
                .parse()
                .map_err(|_| TestError(format!("not a flag: {input}")))
        }
    }

    struct NegateFlag;

    #[async_trait]
    impl SagaStep for NegateFlag {
        type Input = bool;
        type Output = bool;
        type Context = TestContext;
        type Error = TestError;

        fn name(&self) -> &'static str {
            "negate_flag"
        }

        async fn execute(
            &self,
            _ctx: &Self::Context,
            input: Self::Input,
        ) -> Result<Self::Output, Self::Error> {
            Ok(!input)
        }
    }

    #[test]
    fn builder_creates_single_step_saga() {
        let saga: Saga<String, bool, TestContext, TestError> =
            SagaBuilder::new().first_step(ParseFlag).build();

        assert_eq!(saga.step_names(), vec!["parse_flag"]);
    }

    #[test]
    fn builder_chains_steps_with_matching_types() {
        let saga: Saga<String, bool, TestContext, TestError> = SagaBuilder::new()
            .first_step(ParseFlag)
            .then(NegateFlag)
            .then(NegateFlag)
            .build();

        assert_eq!(
            saga.step_names(),
            vec!["parse_flag", "negate_flag", "negate_flag"]
        );
    }

    #[tokio::test]
    async fn built_saga_runs_steps_in_builder_order() {
        let saga = SagaBuilder::new()
            .first_step(ParseFlag)
            .then(NegateFlag)
            .build();

        let result = saga.execute(&TestContext, "true".to_string()).await;

        assert_eq!(result.ok(), Some(false));
    }
}
