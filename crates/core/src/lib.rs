//! Viewo admin console core
//!
//! Session management (token storage, expiry tracking, silent refresh) and
//! hash routing, written against ports so the same logic runs in the browser
//! and natively.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod router;
pub mod session;
pub mod token;
pub mod user;

#[cfg(any(test, feature = "tests"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use config::{SessionConfig, StorageKeys};
pub use context::{ConsoleContext, ConsolePorts};
pub use error::{SessionError, SessionResult, StorageError, TransportError};
pub use router::{Resolution, Route, Router, RouterState};
pub use session::{LoginOutcome, SessionStore, SessionStoreBuilder};
pub use token::TokenClaims;
pub use user::UserProfile;
