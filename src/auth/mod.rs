//! Authentication module
//!
//! Preemptive HTTP Basic credentials plus the WSAPI security token.
//!
//! The `Authenticator` attaches credentials to every request and manages the
//! single-flight, never-refreshed token cache used on mutating requests.

mod authenticator;
mod credentials;
mod types;

pub use authenticator::{parse_security_token, Authenticator};
pub use credentials::{CredentialProvider, Credentials};
pub use types::{FallbackPolicy, SecurityTokenState};

#[cfg(test)]
mod tests;
