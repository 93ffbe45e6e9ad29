//! WSAPI client
//!
//! Executes requests with authentication applied:
//! - Preemptive Basic credentials on every request
//! - Lazy, single-flight security token on mutating requests
//! - Permanent no-token mode for servers without the token endpoint

use super::request::OutboundRequest;
use super::transport::{ReqwestTransport, Transport};
use crate::auth::{Authenticator, CredentialProvider, Credentials, SecurityTokenState};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::{ApiVersion, SECURITY_TOKEN_PATH, WSAPI_PATH};
use std::sync::Arc;
use url::Url;

/// Authenticated WSAPI client
///
/// Cheap to share behind an `Arc`; the token cache is per instance.
#[derive(Debug)]
pub struct WsapiClient {
    server: Url,
    wsapi_version: ApiVersion,
    wsapi_url: String,
    authenticator: Authenticator,
}

impl WsapiClient {
    /// Create a client with default settings and the reqwest transport
    pub fn new(
        server: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(ClientConfig::new(server, username, password))
    }

    /// Create a client that sends through a pre-configured transport
    pub fn with_transport(
        server: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Self::from_config_with_transport(ClientConfig::new(server, username, password), transport)
    }

    /// Create a client from a config, building the reqwest transport from it
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Self::from_config_with_transport(config, Arc::new(transport))
    }

    /// Create a client from a config and an explicit transport
    pub fn from_config_with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let server = config.validate()?;
        let wsapi_url = format!(
            "{}/{}/{}",
            server.as_str().trim_end_matches('/'),
            WSAPI_PATH,
            config.wsapi_version
        );

        let credentials = Credentials::new(config.username, config.password, &server);
        let authenticator = Authenticator::new(
            CredentialProvider::new(credentials),
            transport,
            format!("{wsapi_url}/{SECURITY_TOKEN_PATH}"),
            config.fallback,
        );

        Ok(Self {
            server,
            wsapi_version: config.wsapi_version,
            wsapi_url,
            authenticator,
        })
    }

    /// Execute a request against the WSAPI
    ///
    /// Non-GET requests on non-legacy versions carry the security token as
    /// the `key` query parameter, unless the token endpoint proved
    /// unavailable. Transport errors are returned unchanged.
    pub async fn execute(&self, mut request: OutboundRequest) -> Result<String> {
        if self.wsapi_version.requires_security_token(&request.method) {
            if let Some(token) = self.authenticator.security_token().await? {
                request.attach_security_token(&token)?;
            }
        }
        self.authenticator.send(request).await
    }

    /// GET a path below the WSAPI root (or an absolute URL)
    pub async fn get(&self, path: &str) -> Result<String> {
        self.execute(OutboundRequest::get(self.build_url(path)))
            .await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: impl Into<String>) -> Result<String> {
        self.execute(OutboundRequest::post(self.build_url(path), body))
            .await
    }

    /// PUT a JSON body
    pub async fn put(&self, path: &str, body: impl Into<String>) -> Result<String> {
        self.execute(OutboundRequest::put(self.build_url(path), body))
            .await
    }

    /// DELETE a path
    pub async fn delete(&self, path: &str) -> Result<String> {
        self.execute(OutboundRequest::delete(self.build_url(path)))
            .await
    }

    /// Server URI
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// WSAPI version tag
    pub fn wsapi_version(&self) -> &ApiVersion {
        &self.wsapi_version
    }

    /// WSAPI root, e.g. `https://host/slm/webservice/v2.0`
    pub fn wsapi_url(&self) -> &str {
        &self.wsapi_url
    }

    /// Current security token state
    pub async fn security_token_state(&self) -> SecurityTokenState {
        self.authenticator.state().await
    }

    /// Access the authenticator
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.wsapi_url)
    }
}
