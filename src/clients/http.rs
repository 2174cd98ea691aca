//! Shared HTTP/JSON plumbing for the hosting provider clients
//!
//! Every provider call goes through [`JsonClient::send_json`]: send, read the
//! body as text, surface non-2xx responses with their status and body, parse
//! the rest as JSON. No retries and no timeouts beyond reqwest defaults; a
//! transient failure aborts the whole operation.

use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Result, TranslateError};

/// User agent attached to every provider request
pub const USER_AGENT_VALUE: &str = "translate-tool";

/// A reqwest client carrying client-default headers
#[derive(Debug, Clone, Default)]
pub struct JsonClient {
    client: reqwest::Client,
    defaults: HeaderMap,
}

impl JsonClient {
    pub fn new(defaults: HeaderMap) -> Self {
        Self {
            client: reqwest::Client::new(),
            defaults,
        }
    }

    /// Build a request carrying the client-default headers
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.defaults.clone())
    }

    /// Build a request with request-specific headers layered over the
    /// client defaults
    pub fn request_with(&self, method: Method, url: &str, headers: HeaderMap) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(merge_headers(&self.defaults, headers))
    }

    /// Send a request and return the response body as text, surfacing
    /// non-2xx responses with their status and body
    pub async fn send_text(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!("request failed with {}: {}", status, body);
            return Err(TranslateError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Send a request and parse the JSON response body
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send_text(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Merge headers with defined precedence: request-specific values replace
/// the client defaults per name, keeping every value of a multi-valued
/// override.
pub fn merge_headers(defaults: &HeaderMap, overrides: HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
    }
    for (name, value) in overrides.iter() {
        merged.append(name, value.clone());
    }
    merged
}
