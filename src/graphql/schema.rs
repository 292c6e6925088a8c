//! GraphQL schema definition with queries, mutations, and subscriptions
//!
//! This is the single API surface of the backend.

use async_graphql::{MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::mutations::{AuthMutations, LinkMutations, VoteMutations};
use super::queries::{FeedQueries, SystemQueries};
use super::subscriptions::SubscriptionRoot;

/// The GraphQL schema type
pub type LinknestSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(SystemQueries, FeedQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, LinkMutations, VoteMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> LinknestSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot)
        .data(db)
        .data(auth)
        .finish()
}
