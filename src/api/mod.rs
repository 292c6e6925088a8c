//! API route definitions
//!
//! The primary API is GraphQL at /graphql; only health endpoints are
//! exposed over plain REST.

pub mod health;
