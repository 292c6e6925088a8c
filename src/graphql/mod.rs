//! GraphQL API with subscriptions for real-time updates
//!
//! This module provides the GraphQL API using async-graphql with support
//! for queries, mutations, and subscriptions over WebSocket.
//!
//! This is the single API surface for the Linknest backend.

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

#[cfg(test)]
mod tests;

pub use auth::RequestAuth;
pub use schema::{build_schema, LinknestSchema};
