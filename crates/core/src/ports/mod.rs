//! Ports the session store and router are written against.
//!
//! Browser builds plug in localStorage, `setTimeout`, `fetch` and
//! `location.hash`; native builds and tests plug in the in-memory versions.

pub mod clock;
pub mod hooks;
pub mod location;
pub mod scheduler;
pub mod storage;
pub mod transport;

pub use clock::{Clock, SystemClock};
pub use hooks::{NoopNotifier, NoopRenderer, Notifier, PageRenderer, ToastKind};
pub use location::{ChangeListener, Location, MemoryLocation};
pub use scheduler::{Scheduler, TimerHandle, TimerTask};
pub use storage::{KeyValueStore, MemoryStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport};
