use onboarding_core::Phase;

/// Receives `(phase, target_percent)` reports as saga steps start.
///
/// Reporting is fire-and-forget; implementations must not block.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, phase: Phase, target_percent: u8);
}

/// Reporter that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _phase: Phase, _target_percent: u8) {}
}
