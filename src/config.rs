//! Client configuration
//!
//! `ClientConfig` can be built in code through [`ClientConfig::builder`] or
//! loaded from YAML:
//!
//! ```yaml
//! server: https://rally1.rallydev.com
//! username: user@example.com
//! password: secret
//! wsapi_version: v2.0
//! timeout_ms: 60000
//! fallback: not_found_only
//! integration:
//!   vendor: Acme
//!   name: Sync Tool
//!   version: "1.2"
//! ```

use crate::auth::FallbackPolicy;
use crate::error::{Error, Result};
use crate::types::ApiVersion;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Configuration for a [`WsapiClient`](crate::http::WsapiClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server URI (scheme, host and optional port)
    pub server: String,

    /// Username for Basic authentication
    pub username: String,

    /// Password for Basic authentication
    #[serde(default)]
    pub password: String,

    /// WSAPI version tag
    #[serde(default)]
    pub wsapi_version: ApiVersion,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent sent by the built-in transport
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// What to do when the security token endpoint fails
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Integration identification headers
    #[serde(default)]
    pub integration: Option<IntegrationInfo>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("wsapi-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Identifies the integration issuing requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationInfo {
    /// Vendor of the integration
    #[serde(default)]
    pub vendor: Option<String>,
    /// Integration name
    #[serde(default)]
    pub name: Option<String>,
    /// Integration version
    #[serde(default)]
    pub version: Option<String>,
}

impl ClientConfig {
    /// Create a config with defaults for everything but the identity
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            wsapi_version: ApiVersion::default(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            fallback: FallbackPolicy::default(),
            integration: None,
        }
    }

    /// Create a new config builder
    pub fn builder(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(server, username, password),
        }
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check the config and return the parsed server URI
    pub fn validate(&self) -> Result<Url> {
        if self.username.is_empty() {
            return Err(Error::missing_field("username"));
        }
        if self.timeout_ms == 0 {
            return Err(Error::invalid_value(
                "timeout_ms",
                "must be greater than zero",
            ));
        }

        let server = Url::parse(&self.server)?;
        if server.host_str().is_none() {
            return Err(Error::invalid_value("server", "URI has no host"));
        }
        // The WSAPI root is appended to the path
        if server.query().is_some() || server.fragment().is_some() {
            return Err(Error::invalid_value(
                "server",
                "URI must not carry a query or fragment",
            ));
        }
        Ok(server)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"***")
            .field("wsapi_version", &self.wsapi_version)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("fallback", &self.fallback)
            .field("integration", &self.integration)
            .finish()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the WSAPI version
    #[must_use]
    pub fn wsapi_version(mut self, version: impl Into<ApiVersion>) -> Self {
        self.config.wsapi_version = version.into();
        self
    }

    /// Set the request timeout
    ///
    /// Kept at millisecond precision; a sub-millisecond remainder rounds up.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let mut millis = timeout.as_millis();
        if timeout.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        self.config.timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the token fallback policy
    #[must_use]
    pub fn fallback(mut self, policy: FallbackPolicy) -> Self {
        self.config.fallback = policy;
        self
    }

    /// Set integration identification
    #[must_use]
    pub fn integration(mut self, info: IntegrationInfo) -> Self {
        self.config.integration = Some(info);
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
