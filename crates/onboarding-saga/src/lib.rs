//! Async saga pattern for multi-step operations over non-transactional stores.
//!
//! A saga runs an ordered list of steps. Each step may capture a pre-image of
//! the state it is about to change, then executes; its prepared input is kept
//! so that, if a later step fails, the step can be compensated. Compensations
//! run in reverse order and are best-effort: one failing compensation does not
//! stop the others, and the original step error is always preserved.

mod audit;
mod builder;
mod erased;
mod error;
mod saga;
mod stack;
mod step;

pub use async_trait::async_trait;
pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::SagaStep;
