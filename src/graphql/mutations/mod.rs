pub mod auth;
pub mod links;
pub mod votes;

pub use auth::AuthMutations;
pub use links::LinkMutations;
pub use votes::VoteMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

    pub(crate) use crate::db::{is_unique_violation, CreateLink, CreateUser, CreateVote, Database};
    pub(crate) use crate::error::ApiError;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::AuthService;
}
