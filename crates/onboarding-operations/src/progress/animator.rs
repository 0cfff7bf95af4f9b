use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

type PercentSink = Arc<dyn Fn(u8) + Send + Sync>;

/// Ease-out cubic: fast start, gentle landing. `t` is clamped to `0..=1`.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn interpolate(from: u8, to: u8, progress: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * ease_out_cubic(progress);
    value.round().clamp(0.0, 100.0) as u8
}

struct Frame {
    generation: u64,
    current: u8,
}

/// Animates a percentage toward a target on a fixed tick.
///
/// Only one animation runs at a time: starting a new one, jumping, or
/// cancelling supersedes whatever was running. Every emitted value goes to
/// the sink while the frame lock is held, so a superseded animation can
/// never emit after the call that superseded it returns.
pub struct ProgressAnimator {
    tick: Duration,
    frame: Arc<Mutex<Frame>>,
    task: Mutex<Option<JoinHandle<()>>>,
    sink: PercentSink,
}

impl ProgressAnimator {
    #[must_use]
    pub fn new(tick: Duration, sink: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            tick,
            frame: Arc::new(Mutex::new(Frame {
                generation: 0,
                current: 0,
            })),
            task: Mutex::new(None),
            sink: Arc::new(sink),
        }
    }

    /// Last value emitted to the sink.
    #[must_use]
    pub fn current(&self) -> u8 {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    /// Animate from the current value to `target` over `duration`.
    ///
    /// Outside a tokio runtime, or with a zero duration, the value jumps
    /// straight to the target.
    pub fn animate_to(&self, target: u8, duration: Duration) {
        let target = target.min(100);
        let handle = match Handle::try_current() {
            Ok(handle) if !duration.is_zero() => handle,
            _ => {
                self.jump_to(target);
                return;
            }
        };

        let (generation, from) = {
            let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            frame.generation += 1;
            (frame.generation, frame.current)
        };

        let frame = Arc::clone(&self.frame);
        let sink = Arc::clone(&self.sink);
        let tick = self.tick;
        let task = handle.spawn(async move {
            let started = Instant::now();
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let progress =
                    (started.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0);
                {
                    let mut frame = frame.lock().unwrap_or_else(PoisonError::into_inner);
                    if frame.generation != generation {
                        return;
                    }
                    let value = interpolate(from, target, progress);
                    if value != frame.current {
                        frame.current = value;
                        sink(value);
                    }
                }
                if progress >= 1.0 {
                    return;
                }
            }
        });
        self.replace_task(Some(task));
    }

    /// Cancel any running animation and set the value immediately.
    pub fn jump_to(&self, value: u8) {
        let value = value.min(100);
        {
            let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            frame.generation += 1;
            frame.current = value;
            (self.sink)(value);
        }
        self.replace_task(None);
    }

    /// Stop the running animation, leaving the value where it is.
    /// Cancelling with nothing running is a no-op.
    pub fn cancel(&self) {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation += 1;
        self.replace_task(None);
    }

    fn replace_task(&self, task: Option<JoinHandle<()>>) {
        let previous = std::mem::replace(
            &mut *self.task.lock().unwrap_or_else(PoisonError::into_inner),
            task,
        );
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Drop for ProgressAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}
