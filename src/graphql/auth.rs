//! GraphQL authentication context
//!
//! The HTTP and WebSocket handlers resolve the bearer token once per
//! request and inject the outcome here as an immutable per-request value.
//! Resolvers decide whether a missing or invalid subject fails the
//! operation; extraction itself never fails a request.

use async_graphql::{Context, ErrorExtensions, Result};

use crate::error::ApiError;

/// Outcome of bearer extraction for one request
#[derive(Debug, Clone, Default)]
pub enum RequestAuth {
    /// No bearer token was presented
    #[default]
    Anonymous,
    /// A valid token bound to this subject id
    Subject(String),
    /// A token was presented but failed validation
    Invalid,
}

/// Extension trait to read the auth context from GraphQL resolvers
pub trait AuthExt {
    /// The authenticated subject id, or an error when there is none:
    /// `Unauthenticated` for anonymous requests, `InvalidAssertion` when a
    /// token was presented but rejected.
    fn subject(&self) -> Result<&str>;

    /// The subject id if the request carries a valid token, or None
    /// (for operations where identity is optional)
    #[allow(dead_code)]
    fn try_subject(&self) -> Option<&str>;
}

impl<'a> AuthExt for Context<'a> {
    fn subject(&self) -> Result<&str> {
        match self.data_opt::<RequestAuth>() {
            Some(RequestAuth::Subject(id)) => Ok(id),
            Some(RequestAuth::Invalid) => Err(ApiError::InvalidAssertion.extend()),
            Some(RequestAuth::Anonymous) | None => Err(ApiError::Unauthenticated.extend()),
        }
    }

    fn try_subject(&self) -> Option<&str> {
        match self.data_opt::<RequestAuth>() {
            Some(RequestAuth::Subject(id)) => Some(id),
            _ => None,
        }
    }
}
