//! Request-path error taxonomy
//!
//! Resolvers return these typed errors instead of ad-hoc strings; each
//! variant maps to a stable machine-readable `code` in the GraphQL error
//! extensions. Startup errors (config, bind, migrate) stay on anyhow.

use async_graphql::ErrorExtensions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// An operation that needs an authenticated subject got none.
    #[error("authentication required")]
    Unauthenticated,

    /// A bearer token was presented but is malformed, forged, or expired.
    #[error("invalid or expired token")]
    InvalidAssertion,

    /// Login with an email no account is registered under. Shares its
    /// message with `InvalidCredentials`; only the extension code differs.
    #[error("invalid email or password")]
    UserNotFound,

    /// Login with a wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email is already registered")]
    DuplicateUser,

    #[error("already voted for this link")]
    AlreadyVoted,

    #[error("link not found")]
    LinkNotFound,

    /// Anything the store surfaces that is not a recognized constraint
    /// violation. Propagates verbatim-wrapped to the GraphQL error list.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Hashing or signing failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code exposed in the GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::InvalidAssertion => "INVALID_TOKEN",
            ApiError::UserNotFound => "USER_NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::DuplicateUser => "DUPLICATE_USER",
            ApiError::AlreadyVoted => "ALREADY_VOTED",
            ApiError::LinkNotFound => "LINK_NOT_FOUND",
            ApiError::Store(_) | ApiError::Internal(_) => "INTERNAL",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}
