//! Timers on the current tokio `LocalSet`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;
use viewo_core::ports::{Scheduler, TimerHandle, TimerTask};

/// Runs each timer as a local task that sleeps first.
///
/// Must be used from inside a `LocalSet`.
#[derive(Default)]
pub struct LocalScheduler {
    next_id: Cell<u64>,
    tasks: Rc<RefCell<HashMap<u64, JoinHandle<()>>>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for LocalScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let tasks = Rc::clone(&self.tasks);
        let join = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            tasks.borrow_mut().remove(&id);
            task.await;
        });

        self.tasks.borrow_mut().insert(id, join);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(join) = self.tasks.borrow_mut().remove(&handle.id()) {
            join.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt as _;
    use tokio::task::LocalSet;

    fn flag_task(flag: &Rc<Cell<bool>>) -> TimerTask {
        let flag = Rc::clone(flag);
        async move { flag.set(true) }.boxed_local()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        LocalSet::new()
            .run_until(async {
                let scheduler = LocalScheduler::new();
                let fired = Rc::new(Cell::new(false));
                scheduler.schedule(Duration::from_secs(1680), flag_task(&fired));

                tokio::time::sleep(Duration::from_secs(1679)).await;
                assert!(!fired.get());
                assert_eq!(scheduler.pending(), 1);

                tokio::time::sleep(Duration::from_secs(2)).await;
                assert!(fired.get());
                assert_eq!(scheduler.pending(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        LocalSet::new()
            .run_until(async {
                let scheduler = LocalScheduler::new();
                let fired = Rc::new(Cell::new(false));
                let handle = scheduler.schedule(Duration::from_secs(5), flag_task(&fired));

                scheduler.cancel(handle);
                scheduler.cancel(handle);
                tokio::time::sleep(Duration::from_secs(10)).await;

                assert!(!fired.get());
                assert_eq!(scheduler.pending(), 0);
            })
            .await;
    }
}
