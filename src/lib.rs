//! # WSAPI Client
//!
//! Authentication layer for the WSAPI web-service API.
//!
//! ## Features
//!
//! - **Preemptive Basic Auth**: every request carries `Authorization: Basic`
//! - **Security Token**: fetched lazily from `security/authorize`, cached for
//!   the life of the client and appended as `key=<token>` to mutating requests
//! - **Single-Flight**: concurrent callers share one token fetch
//! - **Legacy Servers**: a missing token endpoint switches the client to
//!   token-less mode permanently; `1.x` API versions never use a token
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsapi_client::{Result, WsapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = WsapiClient::new("https://rally1.rallydev.com", "user", "pass")?;
//!
//!     // GET: Basic auth only
//!     let defects = client.get("defect?fetch=Name").await?;
//!
//!     // POST: Basic auth plus security token
//!     let created = client
//!         .post("defect/create", r#"{"Defect": {"Name": "Broken build"}}"#)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller ──► WsapiClient::execute(request)
//!              │
//!              ├─ non-GET and not 1.x? ──► Authenticator::security_token()
//!              │                             (RwLock, fetch once, or Unavailable)
//!              │                           └─► request.attach_security_token()
//!              │
//!              └─► Authenticator::send() ── Basic header ──► Transport::send()
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and constants
pub mod types;

/// Credentials and security token management
pub mod auth;

/// Authenticated client and transport
pub mod http;

/// Client configuration
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{FallbackPolicy, SecurityTokenState};
pub use config::{ClientConfig, IntegrationInfo};
pub use error::{Error, Result};
pub use http::{OutboundRequest, ReqwestTransport, Transport, WsapiClient};
pub use types::ApiVersion;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
