//! Transport collaborator
//!
//! The client core only needs "send a request, get the body text or an
//! error". `ReqwestTransport` is the default implementation; anything else
//! (a pre-configured client, a test double) can implement [`Transport`].

use super::request::OutboundRequest;
use crate::config::{ClientConfig, IntegrationInfo};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

/// Sends fully decorated requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response body
    ///
    /// Fails with `Error::HttpStatus` on a non-success status and
    /// `Error::Http` when the call cannot complete.
    async fn send(&self, request: OutboundRequest) -> Result<String>;
}

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with timeout, user agent and integration headers
    /// taken from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent);

        if let Some(info) = &config.integration {
            builder = builder.default_headers(integration_headers(info)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Use an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<String> {
        let OutboundRequest {
            method,
            uri,
            headers,
            body,
        } = request;

        let mut req = self.client.request(method.clone(), &uri).headers(headers);
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, status.as_u16());
        Ok(response.text().await?)
    }
}

/// Headers identifying the integration to the server
pub fn integration_headers(info: &IntegrationInfo) -> Result<HeaderMap> {
    let library = format!("wsapi-client v{}", env!("CARGO_PKG_VERSION"));
    let entries = [
        ("x-rallyintegrationvendor", info.vendor.as_deref()),
        ("x-rallyintegrationname", info.name.as_deref()),
        ("x-rallyintegrationversion", info.version.as_deref()),
        ("x-rallyintegrationlibrary", Some(library.as_str())),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in entries {
        let Some(value) = value else { continue };
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value("integration", format!("{name}: {e}")))?;
        headers.insert(HeaderName::from_static(name), value);
    }
    Ok(headers)
}
