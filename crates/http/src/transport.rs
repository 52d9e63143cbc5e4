//! reqwest-backed [`HttpTransport`]

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use viewo_core::TransportError;
use viewo_core::ports::{ApiRequest, ApiResponse, HttpTransport};

const USER_AGENT: &str = concat!("viewo-console/", env!("CARGO_PKG_VERSION"));

/// Resolve a request URL against an optional base.
///
/// Absolute URLs are used as given. Relative ones, such as the default
/// `/api/v1/...` endpoints, need a base (the page origin in the browser).
pub fn resolve_url(base: Option<&Url>, target: &str) -> Result<Url, ClientError> {
    match base {
        Some(base) => Ok(base.join(target)?),
        None => Url::parse(target).map_err(|e| match e {
            url::ParseError::RelativeUrlWithoutBase => ClientError::Configuration(format!(
                "relative URL {target} needs a base URL"
            )),
            e => e.into(),
        }),
    }
}

/// Sends admin API requests with reqwest.
///
/// Status codes are passed through untouched.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// Transport without a base URL; every request URL must be absolute
    pub fn new() -> Result<Self, ClientError> {
        Self::builder().build()
    }

    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = resolve_url(self.base_url.as_ref(), &request.url)?;
        let method = request.method.clone();
        debug!(%method, %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method, url.clone())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(%method, %url, %status, "Received response");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.execute(request).await.map_err(|e| {
            warn!("Request failed: {e}");
            TransportError::from(e)
        })
    }
}

/// Builder for [`ReqwestTransport`]
#[derive(Default)]
pub struct TransportBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportBuilder {
    /// Base that relative request URLs are joined onto
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the transport
    pub fn build(self) -> Result<ReqwestTransport, ClientError> {
        let base_url = self
            .base_url
            .map(|base| Url::parse(&base))
            .transpose()?;
        if base_url.as_ref().is_some_and(Url::cannot_be_a_base) {
            return Err(ClientError::Configuration(
                "base URL cannot be used as a base".to_string(),
            ));
        }

        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(user_agent);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = self.timeout; // Timeouts not supported on WASM
            ClientBuilder::new().user_agent(user_agent).build()?
        };

        Ok(ReqwestTransport { client, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joins_origin() {
        let base = Url::parse("https://admin.viewo.test").unwrap();
        let url = resolve_url(Some(&base), "/api/v1/auth/login").unwrap();
        assert_eq!(url.as_str(), "https://admin.viewo.test/api/v1/auth/login");
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let base = Url::parse("https://admin.viewo.test").unwrap();
        let url = resolve_url(Some(&base), "http://other.test/api/v1/auth/me").unwrap();
        assert_eq!(url.as_str(), "http://other.test/api/v1/auth/me");
    }

    #[test]
    fn test_relative_without_base_is_configuration_error() {
        let result = resolve_url(None, "/api/v1/auth/login");
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_base() {
        let result = ReqwestTransport::builder().base_url("not a url").build();
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));

        let result = ReqwestTransport::builder().base_url("mailto:ops@viewo.test").build();
        assert!(matches!(
            result,
            Err(ClientError::Configuration(message)) if message == "base URL cannot be used as a base"
        ));
    }

    #[test]
    fn test_error_maps_to_transport_error() {
        let error = TransportError::from(ClientError::Configuration("missing base".to_string()));
        assert_eq!(error, TransportError::InvalidRequest("missing base".to_string()));
    }
}
