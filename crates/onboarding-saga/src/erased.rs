use std::any::Any;

use async_trait::async_trait;

use crate::step::SagaStep;

/// Type-erased step payload that can still be cloned, so the saga can keep a
/// copy of each prepared input for compensation.
pub(crate) trait CloneableAny: Any + Send {
    fn clone_box(&self) -> Box<dyn CloneableAny>;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T> CloneableAny for T
where
    T: Clone + Send + 'static,
{
    fn clone_box(&self) -> Box<dyn CloneableAny> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

#[async_trait]
pub(crate) trait ErasedStep<Ctx, Err>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn prepare_erased(
        &self,
        ctx: &Ctx,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, Err>;

    async fn execute_erased(
        &self,
        ctx: &Ctx,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, Err>;

    async fn compensate_erased(&self, ctx: &Ctx, input: Box<dyn CloneableAny>) -> Result<(), Err>;

    fn has_compensation(&self) -> bool;

    fn compensation_description(&self) -> String;
}

pub(crate) struct StepWrapper<S> {
    step: S,
}

impl<S> StepWrapper<S> {
    pub(crate) fn new(step: S) -> Self {
        Self { step }
    }
}

fn downcast_input<S: SagaStep>(input: Box<dyn CloneableAny>) -> S::Input {
    let typed = input
        .into_any()
        .downcast::<S::Input>()
        .expect("type-state builder guarantees correct input type");
    *typed
}

#[async_trait]
impl<S> ErasedStep<S::Context, S::Error> for StepWrapper<S>
where
    S: SagaStep,
{
    fn name(&self) -> &'static str {
        self.step.name()
    }

    async fn prepare_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, S::Error> {
        let prepared = self.step.prepare(ctx, downcast_input::<S>(input)).await?;
        Ok(Box::new(prepared))
    }

    async fn execute_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, S::Error> {
        let output = self.step.execute(ctx, downcast_input::<S>(input)).await?;
        Ok(Box::new(output))
    }

    async fn compensate_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn CloneableAny>,
    ) -> Result<(), S::Error> {
        self.step.compensate(ctx, downcast_input::<S>(input)).await
    }

    fn has_compensation(&self) -> bool {
        self.step.has_compensation()
    }

    fn compensation_description(&self) -> String {
        self.step.compensation_description()
    }
}
