//! One-shot timer port

use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Work run when a timer fires
pub type TimerTask = LocalBoxFuture<'static, ()>;

/// Identifies an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Arms one-shot timers on the UI thread.
///
/// A task never runs before `schedule` has returned its handle. Cancelling a
/// handle that already fired, or was already cancelled, is a no-op.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
    fn cancel(&self, handle: TimerHandle);
}
