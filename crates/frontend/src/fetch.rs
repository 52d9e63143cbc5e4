//! `authFetch` argument and result shapes

use http::header::{HeaderName, HeaderValue};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viewo_core::ports::{ApiRequest, ApiResponse};

/// Subset of the `fetch` init object that `authFetch` understands
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchInit {
    pub method: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl FetchInit {
    /// Build the request for `url`
    pub fn into_request(self, url: String) -> Result<ApiRequest, String> {
        let method = match self.method {
            Some(method) => Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| format!("invalid method {method}"))?,
            None => Method::GET,
        };

        let mut request = ApiRequest::new(method, url);
        for (name, value) in self.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("invalid header name {name}"))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|_| format!("invalid value for header {name}"))?;
            request.headers.insert(header, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }
        Ok(request)
    }
}

/// What `authFetch` resolves to
#[derive(Debug, Serialize)]
pub struct FetchReply {
    pub status: u16,
    pub ok: bool,
    pub body: String,
}

impl From<&ApiResponse> for FetchReply {
    fn from(response: &ApiResponse) -> Self {
        Self {
            status: response.status.as_u16(),
            ok: response.is_success(),
            body: response.text(),
        }
    }
}
