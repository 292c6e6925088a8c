pub mod feed;
pub mod system;

pub use feed::FeedQueries;
pub use system::SystemQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::error::ApiError;
    pub(crate) use crate::graphql::types::*;
}
