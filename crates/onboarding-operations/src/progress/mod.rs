mod animator;
mod machine;

pub use animator::{ProgressAnimator, ease_out_cubic};
pub use machine::{OnboardingProgressMachine, ProgressState};
