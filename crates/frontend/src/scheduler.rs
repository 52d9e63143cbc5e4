//! `setTimeout` backed scheduler

use gloo::timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use viewo_core::ports::{Scheduler, TimerHandle, TimerTask};
use wasm_bindgen_futures::spawn_local;

/// Largest delay `setTimeout` honours; longer ones fire immediately
const MAX_TIMEOUT_MILLIS: u32 = i32::MAX as u32;

/// Arms one-shot timers with `setTimeout` and runs their task on the
/// microtask queue
#[derive(Default)]
pub struct BrowserScheduler {
    next_id: Cell<u64>,
    timers: Rc<RefCell<HashMap<u64, Timeout>>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let millis = u32::try_from(delay.as_millis())
            .unwrap_or(MAX_TIMEOUT_MILLIS)
            .min(MAX_TIMEOUT_MILLIS);
        let timers = Rc::clone(&self.timers);
        let timeout = Timeout::new(millis, move || {
            // Must not drop a Timeout from inside its own callback
            let fired = timers.borrow_mut().remove(&id);
            spawn_local(async move {
                drop(fired);
                task.await;
            });
        });

        self.timers.borrow_mut().insert(id, timeout);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        // Dropping a Timeout clears it
        self.timers.borrow_mut().remove(&handle.id());
    }
}
