//! Error types shared by the session store, the ports and the adapters

use thiserror::Error;

/// Standard result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Errors raised by the session store
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session could not be recovered and has been cleared
    #[error("Authentication expired. Please log in again.")]
    AuthExpired,

    /// A refresh was requested but no refresh token is stored
    #[error("No refresh token stored")]
    MissingRefreshToken,

    /// The server refused to issue a new access token
    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),

    /// Network or request error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a body we could not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The server answered with a status the caller did not expect
    #[error("Server error {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SessionError {
    /// Whether the caller has to log in again to continue
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Errors produced by an [`HttpTransport`](crate::ports::HttpTransport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connection, CORS, timeout)
    #[error("Network failure: {0}")]
    Network(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors produced by a [`KeyValueStore`](crate::ports::KeyValueStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing store refused the write (quota, private mode, IO)
    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },

    /// The backing store is not reachable at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create a write error for `key`
    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            message: message.into(),
        }
    }
}
