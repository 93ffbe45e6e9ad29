//! Error types for the WSAPI client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Transport failures (network errors and non-success statuses) are kept
//! distinct from URI and configuration failures so the security-token
//! bootstrap can decide which ones to recover from.

use thiserror::Error;

/// The main error type for the WSAPI client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // URI Errors
    // ============================================================================
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unable to build URI with security token for '{uri}': {source}")]
    UriConstruction {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    // ============================================================================
    // Security Token Errors
    // ============================================================================
    #[error("Malformed security token response: {message}")]
    TokenResponse { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a URI construction error
    pub fn uri_construction(uri: impl Into<String>, source: url::ParseError) -> Self {
        Self::UriConstruction {
            uri: uri.into(),
            source,
        }
    }

    /// Create a token response error
    pub fn token_response(message: impl Into<String>) -> Self {
        Self::TokenResponse {
            message: message.into(),
        }
    }

    /// True for failures raised by the transport: network errors and
    /// non-success HTTP statuses
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpStatus { .. })
    }

    /// True when the server answered 404
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::HttpStatus { status, .. } => *status == 404,
            Error::Http(e) => e.status().is_some_and(|s| s.as_u16() == 404),
            _ => false,
        }
    }
}

/// Result type alias for the WSAPI client
pub type Result<T> = std::result::Result<T, Error>;
