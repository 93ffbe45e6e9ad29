//! HTTP module
//!
//! The authenticated WSAPI client and the transport it delegates to.
//!
//! # Features
//!
//! - **Preemptive Basic Auth**: credentials on every request, no 401 round-trip
//! - **Security Token**: fetched once, attached to mutating requests
//! - **Legacy Fallback**: servers without the token endpoint keep working
//! - **Pluggable Transport**: reqwest by default, any [`Transport`] otherwise

mod client;
mod request;
mod transport;

pub use client::WsapiClient;
pub use request::OutboundRequest;
pub use transport::{integration_headers, ReqwestTransport, Transport};

#[cfg(test)]
pub(crate) mod testing;
