use std::time::Instant;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Step executed successfully.
    Executed,
    /// Step failed during preparation or execution.
    Failed,
    /// Step was compensated successfully.
    Compensated,
    /// Step compensation failed.
    CompensationFailed,
    /// Step had nothing to undo and was left in place during rollback.
    Kept,
}

impl StepStatus {
    fn marker(self) -> &'static str {
        match self {
            Self::Executed => "✓",
            Self::Failed => "✗",
            Self::Compensated => "↩",
            Self::CompensationFailed => "⚠",
            Self::Kept => "·",
        }
    }
}

/// Record of a step's execution in the saga.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the step started executing.
    pub started_at: Instant,
    /// When the step completed (execution or compensation).
    pub completed_at: Option<Instant>,
    /// Description of compensation (if applicable).
    pub compensation_description: Option<String>,
}

/// Audit log tracking all step executions in a saga.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_success(&mut self, compensation_description: String) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_compensated(&mut self, step_name: &str) {
        self.mark_executed(step_name, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, step_name: &str) {
        self.mark_executed(step_name, StepStatus::CompensationFailed);
    }

    pub(crate) fn record_kept(&mut self, step_name: &str) {
        self.mark_executed(step_name, StepStatus::Kept);
    }

    // Only steps that actually executed can be compensated; a failed step
    // sharing the name keeps its Failed status.
    fn mark_executed(&mut self, step_name: &str, status: StepStatus) {
        for record in &mut self.records {
            if record.name == step_name && record.status == StepStatus::Executed {
                record.status = status;
                record.completed_at = Some(Instant::now());
            }
        }
    }

    /// Get all records in the audit log.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Name of the step that aborted the saga, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&str> {
        self.records
            .iter()
            .find(|record| record.status == StepStatus::Failed)
            .map(|record| record.name.as_str())
    }

    /// Names of steps whose compensation ran, in the order they were compensated.
    /// Steps with nothing to undo are not included.
    #[must_use]
    pub fn compensated_steps(&self) -> Vec<&str> {
        self.records
            .iter()
            .rev()
            .filter(|record| {
                matches!(
                    record.status,
                    StepStatus::Compensated | StepStatus::CompensationFailed
                )
            })
            .map(|record| record.name.as_str())
            .collect()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{} {}", record.status.marker(), record.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
