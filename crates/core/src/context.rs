//! Application shell wiring the session store and the router together

use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::ports::{
    Clock, HttpTransport, KeyValueStore, Location, NoopNotifier, NoopRenderer, Notifier,
    PageRenderer, Scheduler, SystemClock,
};
use crate::router::Router;
use crate::session::SessionStore;
use std::rc::Rc;

/// Ports a console is built from
pub struct ConsolePorts {
    pub storage: Rc<dyn KeyValueStore>,
    pub transport: Rc<dyn HttpTransport>,
    pub scheduler: Rc<dyn Scheduler>,
    pub location: Rc<dyn Location>,
    pub clock: Rc<dyn Clock>,
    pub notifier: Rc<dyn Notifier>,
    pub renderer: Rc<dyn PageRenderer>,
}

impl ConsolePorts {
    /// Required ports, with the system clock and no-op UI hooks
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        transport: Rc<dyn HttpTransport>,
        scheduler: Rc<dyn Scheduler>,
        location: Rc<dyn Location>,
    ) -> Self {
        Self {
            storage,
            transport,
            scheduler,
            location,
            clock: Rc::new(SystemClock),
            notifier: Rc::new(NoopNotifier),
            renderer: Rc::new(NoopRenderer),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Rc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Rc<dyn PageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Owns the one session store and the one router of the console
#[derive(Clone)]
pub struct ConsoleContext {
    session: SessionStore,
    router: Router,
}

impl ConsoleContext {
    pub fn new(config: SessionConfig, ports: ConsolePorts) -> SessionResult<Self> {
        let session = SessionStore::builder(config)
            .storage(ports.storage)
            .transport(ports.transport)
            .scheduler(ports.scheduler)
            .location(ports.location.clone())
            .clock(ports.clock)
            .notifier(ports.notifier)
            .build()?;
        let router = Router::new(session.clone(), ports.location, ports.renderer);

        Ok(Self { session, router })
    }

    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Restore the stored session, then resolve the current fragment
    pub async fn start(&self) {
        self.session.init().await;
        self.router.init();
    }
}
