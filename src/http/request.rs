//! Outbound request type
//!
//! A transport-neutral request that the client decorates with credentials
//! and, on mutating calls, the security token before dispatch.

use crate::error::{Error, Result};
use crate::types::SECURITY_TOKEN_PARAM;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

/// A request to the WSAPI
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URI
    pub uri: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body (JSON text)
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    /// POST request with a body
    pub fn post(uri: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::POST, uri).with_body(body)
    }

    /// PUT request with a body
    pub fn put(uri: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::PUT, uri).with_body(body)
    }

    /// DELETE request
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append `key=<token>` to the URI, keeping existing query parameters
    pub fn attach_security_token(&mut self, token: &str) -> Result<()> {
        let mut url =
            Url::parse(&self.uri).map_err(|e| Error::uri_construction(self.uri.clone(), e))?;
        url.query_pairs_mut()
            .append_pair(SECURITY_TOKEN_PARAM, token);
        self.uri = url.into();
        Ok(())
    }

    /// All values of a query parameter, decoded
    pub fn query_values(&self, key: &str) -> Vec<String> {
        Url::parse(&self.uri)
            .map(|url| {
                url.query_pairs()
                    .filter(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}
