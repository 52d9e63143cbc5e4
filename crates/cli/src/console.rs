//! Console context wired with the native ports

use crate::config::CliConfig;
use crate::file_store::{JsonFileStore, SESSION_FILE};
use crate::logging::LogNotifier;
use crate::scheduler::LocalScheduler;
use anyhow::Result;
use std::rc::Rc;
use tracing::debug;
use viewo_core::ports::MemoryLocation;
use viewo_core::{ConsoleContext, ConsolePorts};
use viewo_http::ReqwestTransport;

/// Session and router of one CLI invocation.
///
/// The fragment lives in memory; only the session is persisted.
pub struct Console {
    pub context: ConsoleContext,
    pub location: Rc<MemoryLocation>,
}

impl Console {
    /// Build from configuration, loading the session file from the state dir
    pub fn open(config: &CliConfig) -> Result<Self> {
        let session_path = config.state_dir()?.join(SESSION_FILE);
        let storage = JsonFileStore::open(&session_path)?;
        debug!(path = %storage.path().display(), "Opened session file");

        let mut transport = ReqwestTransport::builder();
        if let Some(timeout) = config.request_timeout() {
            transport = transport.timeout(timeout);
        }

        let location = Rc::new(MemoryLocation::new());
        let ports = ConsolePorts::new(
            Rc::new(storage),
            Rc::new(transport.build()?),
            Rc::new(LocalScheduler::new()),
            location.clone(),
        )
        .with_notifier(Rc::new(LogNotifier));

        let context = ConsoleContext::new(config.session.clone(), ports)?;
        Ok(Self::new(context, location))
    }

    pub fn new(context: ConsoleContext, location: Rc<MemoryLocation>) -> Self {
        Self { context, location }
    }
}
