//! Authenticator implementation
//!
//! Applies Basic credentials to every request and owns the security token
//! cache. The token is fetched lazily, at most once per client, through the
//! same authenticated send path used for ordinary requests.

use super::credentials::CredentialProvider;
use super::types::{FallbackPolicy, SecurityTokenState};
use crate::error::{Error, Result};
use crate::http::{OutboundRequest, Transport};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Authenticator handles credentials and the security token for one client
pub struct Authenticator {
    /// Basic auth header source
    provider: CredentialProvider,
    /// Transport shared with the owning client
    transport: Arc<dyn Transport>,
    /// Absolute URL of the authorize endpoint
    token_url: String,
    /// Which bootstrap failures settle as `Unavailable`
    fallback: FallbackPolicy,
    /// Token cache, scoped to this instance
    state: RwLock<SecurityTokenState>,
}

impl Authenticator {
    /// Create an authenticator sending through `transport`
    pub fn new(
        provider: CredentialProvider,
        transport: Arc<dyn Transport>,
        token_url: impl Into<String>,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            provider,
            transport,
            token_url: token_url.into(),
            fallback,
            state: RwLock::new(SecurityTokenState::Unresolved),
        }
    }

    /// Attach the Basic header, replacing any existing `Authorization`
    pub fn apply(&self, request: &mut OutboundRequest) {
        let value = self.provider.build_auth_header();
        request.headers.insert(AUTHORIZATION, value);
    }

    /// Authenticate and hand the request to the transport
    pub async fn send(&self, mut request: OutboundRequest) -> Result<String> {
        self.apply(&mut request);
        debug!(method = %request.method, uri = %request.uri, "Sending WSAPI request");
        self.transport.send(request).await
    }

    /// Resolve the security token, fetching it on first use
    ///
    /// Returns `None` once the endpoint has been found unavailable.
    /// Concurrent callers block on the write lock until the one in-flight
    /// fetch settles, then reuse its result.
    pub async fn security_token(&self) -> Result<Option<String>> {
        {
            let state = self.state.read().await;
            if state.is_settled() {
                return Ok(state.token().map(String::from));
            }
        }

        let mut state = self.state.write().await;

        // Another task may have settled it while we waited
        if state.is_settled() {
            return Ok(state.token().map(String::from));
        }

        match self.fetch_security_token().await {
            Ok(token) => {
                debug!("Security token resolved");
                *state = SecurityTokenState::Resolved(token.clone());
                Ok(Some(token))
            }
            Err(e) if self.fallback.falls_back_on(&e) => {
                warn!(
                    error = %e,
                    "Security token endpoint unavailable, continuing without a token"
                );
                *state = SecurityTokenState::Unavailable;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Snapshot of the token state
    pub async fn state(&self) -> SecurityTokenState {
        self.state.read().await.clone()
    }

    /// URL of the authorize endpoint
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Credential source
    pub fn provider(&self) -> &CredentialProvider {
        &self.provider
    }

    /// GET the authorize endpoint and extract the token
    ///
    /// Response structure: `{"OperationResult": {"SecurityToken": "..."}}`
    async fn fetch_security_token(&self) -> Result<String> {
        let request = OutboundRequest::get(&self.token_url);
        let body = self.send(request).await?;
        parse_security_token(&body)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("provider", &self.provider)
            .field("token_url", &self.token_url)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    #[serde(rename = "OperationResult")]
    operation_result: OperationResult,
}

#[derive(Debug, Deserialize)]
struct OperationResult {
    #[serde(rename = "SecurityToken")]
    security_token: Option<String>,
}

/// Extract the token from an authorize response body
pub fn parse_security_token(body: &str) -> Result<String> {
    let response: AuthorizeResponse = serde_json::from_str(body)
        .map_err(|e| Error::token_response(format!("invalid authorize response: {e}")))?;

    match response.operation_result.security_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::token_response(
            "OperationResult.SecurityToken missing or empty",
        )),
    }
}
