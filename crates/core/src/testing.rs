//! Deterministic ports for tests of code built on the session store

use crate::ports::{Clock, Notifier, PageRenderer, Scheduler, TimerHandle, TimerTask, ToastKind};
use crate::router::Route;
use crate::user::UserProfile;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Unsigned, JWT-shaped token whose payload carries `exp` (Unix seconds)
pub fn unsigned_token(exp_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"sub":"1","username":"admin","role":"admin","type":"access","exp":{exp_secs}}}"#
    ));
    format!("{header}.{payload}.unsigned")
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now_millis: Cell<i64>,
}

impl FixedClock {
    pub const fn new(now_millis: i64) -> Self {
        Self {
            now_millis: Cell::new(now_millis),
        }
    }

    pub fn now_secs(&self) -> i64 {
        self.now_millis.get() / 1000
    }

    /// Token expiring `secs` from now
    pub fn token_expiring_in(&self, secs: i64) -> String {
        unsigned_token(self.now_secs() + secs)
    }

    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now_millis.set(self.now_millis.get().saturating_add(by));
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(1_700_000_000_000)
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now_millis.get()
    }
}

struct ArmedTimer {
    handle: TimerHandle,
    delay: Duration,
    task: TimerTask,
}

/// Scheduler whose timers only fire when the test fires them
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<u64>,
    armed: RefCell<Vec<ArmedTimer>>,
    cancelled: Cell<usize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays of the timers still armed, oldest first
    pub fn pending(&self) -> Vec<Duration> {
        self.armed.borrow().iter().map(|timer| timer.delay).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.armed.borrow().len()
    }

    /// How many armed timers were cancelled
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.get()
    }

    /// Fire the oldest armed timer. Returns false when none was armed.
    pub async fn fire_next(&self) -> bool {
        let timer = {
            let mut armed = self.armed.borrow_mut();
            if armed.is_empty() {
                return false;
            }
            armed.remove(0)
        };
        timer.task.await;
        true
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = TimerHandle::new(id);
        self.armed.borrow_mut().push(ArmedTimer {
            handle,
            delay,
            task,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut armed = self.armed.borrow_mut();
        let before = armed.len();
        armed.retain(|timer| timer.handle != handle);
        if armed.len() < before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

/// Notifier that keeps every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, ToastKind)> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.messages.borrow_mut().push((message.to_string(), kind));
    }
}

/// What a [`RecordingRenderer`] was asked to draw
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Login,
    App {
        route: Route,
        display_name: Option<String>,
    },
    Highlight(Route),
}

/// Renderer that keeps every call
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: RefCell<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    /// Route of the last page drawn
    pub fn last_page(&self) -> Option<Route> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            RenderCall::Login => Some(Route::Login),
            RenderCall::App { route, .. } => Some(*route),
            RenderCall::Highlight(_) => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl PageRenderer for RecordingRenderer {
    fn show_login(&self) {
        self.calls.borrow_mut().push(RenderCall::Login);
    }

    fn show_app(&self, route: Route, user: Option<&UserProfile>) {
        self.calls.borrow_mut().push(RenderCall::App {
            route,
            display_name: user.map(|user| user.display_name().to_string()),
        });
    }

    fn highlight_nav(&self, route: Route) {
        self.calls.borrow_mut().push(RenderCall::Highlight(route));
    }
}
