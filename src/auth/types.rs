//! Auth state and policy types

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Lifecycle of the per-client security token
///
/// `Resolved` and `Unavailable` are terminal: once reached, the state never
/// changes again for the lifetime of the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SecurityTokenState {
    /// No resolution attempt has settled yet
    #[default]
    Unresolved,
    /// Token fetched from the authorize endpoint
    Resolved(String),
    /// The endpoint failed once; mutating requests go out without a token
    Unavailable,
}

impl SecurityTokenState {
    /// True for `Resolved` and `Unavailable`
    pub fn is_settled(&self) -> bool {
        !matches!(self, SecurityTokenState::Unresolved)
    }

    /// The token, if resolved
    pub fn token(&self) -> Option<&str> {
        match self {
            SecurityTokenState::Resolved(token) => Some(token),
            _ => None,
        }
    }
}

/// Which token bootstrap failures settle the state as `Unavailable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Any failure falls back permanently
    #[default]
    AnyFailure,
    /// Only a 404 falls back; other failures reach the caller and the next
    /// mutating request tries again
    NotFoundOnly,
}

impl FallbackPolicy {
    /// Whether `error` should settle the token as unavailable
    pub fn falls_back_on(self, error: &Error) -> bool {
        match self {
            FallbackPolicy::AnyFailure => true,
            FallbackPolicy::NotFoundOnly => error.is_not_found(),
        }
    }
}
