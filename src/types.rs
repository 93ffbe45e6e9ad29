//! Common types used throughout the WSAPI client
//!
//! Shared constants and the API version tag.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Path below the server URI where the WSAPI is mounted
pub const WSAPI_PATH: &str = "slm/webservice";

/// Path below the WSAPI root of the security token endpoint
pub const SECURITY_TOKEN_PATH: &str = "security/authorize";

/// Query parameter carrying the security token
pub const SECURITY_TOKEN_PARAM: &str = "key";

/// WSAPI version used when none is configured
pub const DEFAULT_WSAPI_VERSION: &str = "v2.0";

// ============================================================================
// API Version
// ============================================================================

static LEGACY_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1\.\d+$").expect("valid legacy version pattern"));

/// WSAPI version tag (e.g. `v2.0`, `1.43`)
///
/// Fixed for the lifetime of a client. Legacy `1.x` versions predate the
/// security token and never carry one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Create a version tag
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The raw tag
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `1.<minor>` versions
    pub fn is_legacy(&self) -> bool {
        LEGACY_VERSION.is_match(&self.0)
    }

    /// Whether a request with this method needs the security token
    pub fn requires_security_token(&self, method: &reqwest::Method) -> bool {
        *method != reqwest::Method::GET && !self.is_legacy()
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::new(DEFAULT_WSAPI_VERSION)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for ApiVersion {
    fn from(version: String) -> Self {
        Self(version)
    }
}
