//! HTTP transport for the Viewo admin console
//!
//! [`ReqwestTransport`] implements the session store's transport port on top
//! of reqwest, natively and in the browser.

pub mod error;
pub mod transport;

pub use error::ClientError;
pub use transport::{ReqwestTransport, TransportBuilder, resolve_url};
