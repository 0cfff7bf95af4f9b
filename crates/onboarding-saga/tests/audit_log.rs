//! Integration tests for saga audit logging.

use onboarding_saga::{SagaBuilder, SagaStep, StepStatus, async_trait};

struct TestContext;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct TestError(String);

struct LabelStep {
    name: &'static str,
}

#[async_trait]
impl SagaStep for LabelStep {
    type Input = Vec<&'static str>;
    type Output = Vec<&'static str>;
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn execute(
        &self,
        _ctx: &Self::Context,
        mut input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        input.push(self.name);
        Ok(input)
    }

    fn compensation_description(&self) -> String {
        format!("forget {}", self.name)
    }
}

struct RejectStep;

#[async_trait]
impl SagaStep for RejectStep {
    type Input = Vec<&'static str>;
    type Output = Vec<&'static str>;
    type Context = TestContext;
    type Error = TestError;

    fn name(&self) -> &'static str {
        "reject"
    }

    async fn execute(
        &self,
        _ctx: &Self::Context,
        _input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        Err(TestError("rejected".to_string()))
    }
}

#[tokio::test]
async fn successful_execution_logs_all_steps_as_executed() -> anyhow::Result<()> {
    let saga = SagaBuilder::new()
        .first_step(LabelStep { name: "step_a" })
        .then(LabelStep { name: "step_b" })
        .build();

    let (result, audit_log) = saga.execute_with_audit(&TestContext, Vec::new()).await;

    assert_eq!(result?, vec!["step_a", "step_b"]);
    let records = audit_log.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.status == StepStatus::Executed));
    assert_eq!(
        records[1].compensation_description.as_deref(),
        Some("forget step_b")
    );
    assert!(audit_log.failed_step().is_none());
    Ok(())
}

#[tokio::test]
async fn failed_execution_logs_failure_and_compensations() {
    let saga = SagaBuilder::new()
        .first_step(LabelStep { name: "step_a" })
        .then(LabelStep { name: "step_b" })
        .then(RejectStep)
        .build();

    let (result, audit_log) = saga.execute_with_audit(&TestContext, Vec::new()).await;

    assert!(result.is_err());
    assert_eq!(audit_log.failed_step(), Some("reject"));
    assert_eq!(audit_log.compensated_steps(), vec!["step_b", "step_a"]);
    assert_eq!(audit_log.summary(), "↩ step_a\n↩ step_b\n✗ reject");
}
