//! Scenario tests for the session store, the router and the console context

mod context;
mod router;

use crate::config::SessionConfig;
use crate::context::{ConsoleContext, ConsolePorts};
use crate::ports::transport::mock::MockTransport;
use crate::ports::{ApiRequest, ApiResponse, KeyValueStore, MemoryLocation, MemoryStore};
use crate::session::SessionStore;
use crate::testing::{FixedClock, ManualScheduler, RecordingNotifier, RecordingRenderer};
use http::StatusCode;
use http::header::AUTHORIZATION;
use serde_json::Value;
use std::rc::Rc;

pub(crate) const API_BASE: &str = "http://admin.test/api/v1";

/// Ports shared by a test, kept concrete so the test can inspect them
pub(crate) struct Harness {
    pub clock: Rc<FixedClock>,
    pub storage: Rc<MemoryStore>,
    pub scheduler: Rc<ManualScheduler>,
    pub location: Rc<MemoryLocation>,
    pub notifier: Rc<RecordingNotifier>,
    pub renderer: Rc<RecordingRenderer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::at_fragment("")
    }

    pub fn at_fragment(fragment: &str) -> Self {
        Self {
            clock: Rc::new(FixedClock::default()),
            storage: Rc::new(MemoryStore::new()),
            scheduler: Rc::new(ManualScheduler::new()),
            location: Rc::new(MemoryLocation::with_fragment(fragment)),
            notifier: Rc::new(RecordingNotifier::default()),
            renderer: Rc::new(RecordingRenderer::default()),
        }
    }

    pub fn config() -> SessionConfig {
        SessionConfig::new(API_BASE)
    }

    pub fn session(&self, transport: MockTransport) -> SessionStore {
        SessionStore::builder(Self::config())
            .storage(self.storage.clone())
            .transport(Rc::new(transport))
            .scheduler(self.scheduler.clone())
            .location(self.location.clone())
            .clock(self.clock.clone())
            .notifier(self.notifier.clone())
            .build()
            .unwrap()
    }

    pub fn context(&self, transport: MockTransport) -> ConsoleContext {
        let ports = ConsolePorts::new(
            self.storage.clone(),
            Rc::new(transport),
            self.scheduler.clone(),
            self.location.clone(),
        )
        .with_clock(self.clock.clone())
        .with_notifier(self.notifier.clone())
        .with_renderer(self.renderer.clone());
        ConsoleContext::new(Self::config(), ports).unwrap()
    }

    /// Store a session as a previous login would have
    pub fn seed_session(&self, access_token: &str, refresh_token: &str) {
        let keys = Self::config().storage_keys;
        self.storage.set(&keys.access_token, access_token).unwrap();
        self.storage.set(&keys.refresh_token, refresh_token).unwrap();
        self.storage
            .set(&keys.user, r#"{"id":1,"username":"admin","name":"Admin"}"#)
            .unwrap();
    }
}

pub(crate) fn url(path: &str) -> String {
    format!("{API_BASE}{path}")
}

pub(crate) fn ok_json(body: &Value) -> ApiResponse {
    ApiResponse::json_value(StatusCode::OK, body)
}

pub(crate) fn is_call(request: &ApiRequest, path: &str) -> bool {
    request.url == url(path)
}

pub(crate) fn bearer_of(request: &ApiRequest) -> Option<String> {
    request
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub(crate) fn body_of(request: &ApiRequest) -> Value {
    request
        .body
        .as_ref()
        .map(|body| serde_json::from_slice(body).unwrap())
        .unwrap_or(Value::Null)
}
