//! Client error types

use thiserror::Error;
use viewo_core::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// URL could not be parsed or joined onto the base
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<ClientError> for TransportError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Request(e) if e.is_builder() => Self::InvalidRequest(e.to_string()),
            ClientError::Request(e) => Self::Network(e.to_string()),
            ClientError::InvalidUrl(e) => Self::InvalidRequest(e.to_string()),
            ClientError::Configuration(message) => Self::InvalidRequest(message),
        }
    }
}
