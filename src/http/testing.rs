//! In-memory transport for unit tests

use super::{OutboundRequest, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Canned response for the authorize endpoint
#[derive(Debug, Clone)]
pub enum TokenReply {
    Token(String),
    Status(u16),
    Body(String),
}

/// Records every request and answers from canned replies
pub struct RecordingTransport {
    token_reply: Mutex<TokenReply>,
    token_delay: Duration,
    token_calls: AtomicUsize,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub fn new(token_reply: TokenReply) -> Self {
        Self {
            token_reply: Mutex::new(token_reply),
            token_delay: Duration::ZERO,
            token_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self::new(TokenReply::Token(token.to_string()))
    }

    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    pub fn set_token_reply(&self, reply: TokenReply) {
        *self.token_reply.lock().unwrap() = reply;
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    /// Requests that were not token fetches
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !is_token_request(r))
            .cloned()
            .collect()
    }

    /// Every request, token fetches included
    pub fn all_requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn is_token_request(request: &OutboundRequest) -> bool {
    request.uri.ends_with("/security/authorize")
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<String> {
        let token_request = is_token_request(&request);
        self.requests.lock().unwrap().push(request);

        if !token_request {
            return Ok(r#"{"OperationResult": {"Errors": []}}"#.to_string());
        }

        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if !self.token_delay.is_zero() {
            tokio::time::sleep(self.token_delay).await;
        }

        let reply = self.token_reply.lock().unwrap().clone();
        match reply {
            TokenReply::Token(token) => Ok(serde_json::json!({
                "OperationResult": { "SecurityToken": token }
            })
            .to_string()),
            TokenReply::Status(status) => Err(Error::http_status(status, "")),
            TokenReply::Body(body) => Ok(body),
        }
    }
}
