use crate::erased::CloneableAny;

/// A registered compensation: the index of the step to undo and the
/// prepared input it executed with.
pub(crate) type Compensation = (usize, Box<dyn CloneableAny>);

/// Per-attempt undo stack.
///
/// Entries are drained in LIFO order. Once rollback has begun the stack
/// refuses new entries, and a second rollback request is a no-op.
#[derive(Default)]
pub(crate) struct CompensationStack {
    entries: Vec<Compensation>,
    rolling_back: bool,
}

impl CompensationStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a compensation. Returns `false` if rollback is in progress.
    #[must_use]
    pub(crate) fn push(&mut self, index: usize, input: Box<dyn CloneableAny>) -> bool {
        if self.is_rolling_back() {
            return false;
        }
        self.entries.push((index, input));
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_rolling_back(&self) -> bool {
        self.rolling_back
    }

    /// Enter rollback and hand out the registered compensations, most recent first.
    ///
    /// Returns `None` when a rollback is already running.
    pub(crate) fn begin_rollback(&mut self) -> Option<Vec<Compensation>> {
        if self.is_rolling_back() {
            return None;
        }
        self.rolling_back = true;
        let mut drained: Vec<Compensation> = self.entries.drain(..).collect();
        drained.reverse();
        Some(drained)
    }

    pub(crate) fn finish_rollback(&mut self) {
        self.entries.clear();
        self.rolling_back = false;
    }
}
