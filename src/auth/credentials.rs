//! Basic authentication credentials

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;
use std::fmt;
use url::Url;

/// Identity used for every request, scoped to the server it was issued for
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    target_host: String,
}

impl Credentials {
    /// Create credentials scoped to the host (and port) of `server`
    pub fn new(username: impl Into<String>, password: impl Into<String>, server: &Url) -> Self {
        let host = server.host_str().unwrap_or_default();
        let target_host = match server.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Self {
            username: username.into(),
            password: password.into(),
            target_host,
        }
    }

    /// Username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// `host[:port]` these credentials belong to
    pub fn target_host(&self) -> &str {
        &self.target_host
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("target_host", &self.target_host)
            .finish()
    }
}

/// Produces the preemptive `Authorization: Basic` header
///
/// The header is sent on every request without waiting for a 401 challenge,
/// since every WSAPI resource is protected.
#[derive(Debug, Clone)]
pub struct CredentialProvider {
    credentials: Credentials,
}

impl CredentialProvider {
    /// Wrap a set of credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Stored credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the Basic header value
    ///
    /// The value depends only on the stored credentials, so the same header
    /// goes on every request. `Basic ` followed by standard base64 is always
    /// visible ASCII, which `HeaderValue` accepts; the conversion cannot fail.
    pub fn build_auth_header(&self) -> HeaderValue {
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.username, self.credentials.password
        ));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .expect("visible ASCII header value");
        value.set_sensitive(true);
        value
    }
}
