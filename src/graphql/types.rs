//! GraphQL type definitions
//!
//! These types mirror the stored records but are decorated with
//! async-graphql attributes. Relation fields resolve lazily against the
//! repositories via `ComplexObject` resolvers.

use async_graphql::{ComplexObject, Context, ErrorExtensions, Result, SimpleObject, ID};

use crate::db::{Database, LinkRecord, UserRecord, VoteRecord};
use crate::error::ApiError;

/// A registered user
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct User {
    /// Unique user ID
    pub id: ID,
    /// Display name
    pub name: String,
    /// Email address (login identifier)
    pub email: String,
}

#[ComplexObject]
impl User {
    /// Links posted by this user
    async fn links(&self, ctx: &Context<'_>) -> Result<Vec<Link>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .links()
            .list_by_user(&self.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(records.into_iter().map(Link::from).collect())
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        // The password digest stays in the record; it has no GraphQL field.
        Self {
            id: ID(r.id),
            name: r.name,
            email: r.email,
        }
    }
}

/// A posted link
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Link {
    /// Unique link ID
    pub id: ID,
    /// The linked URL
    pub url: String,
    /// Short description
    pub description: String,
    /// When the link was posted (ISO-8601)
    pub created_at: String,
    #[graphql(skip)]
    pub posted_by_id: String,
}

#[ComplexObject]
impl Link {
    /// The user who posted this link
    async fn posted_by(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db
            .users()
            .get_by_id(&self.posted_by_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(record.map(User::from))
    }

    /// Votes cast for this link
    async fn votes(&self, ctx: &Context<'_>) -> Result<Vec<Vote>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db
            .votes()
            .list_by_link(&self.id)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(records.into_iter().map(Vote::from).collect())
    }
}

impl From<LinkRecord> for Link {
    fn from(r: LinkRecord) -> Self {
        Self {
            id: ID(r.id),
            url: r.url,
            description: r.description,
            created_at: r.created_at,
            posted_by_id: r.posted_by,
        }
    }
}

/// A vote by a user for a link
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Vote {
    /// Unique vote ID
    pub id: ID,
    #[graphql(skip)]
    pub user_id: String,
    #[graphql(skip)]
    pub link_id: String,
}

#[ComplexObject]
impl Vote {
    /// The voting user
    async fn user(&self, ctx: &Context<'_>) -> Result<User> {
        let db = ctx.data_unchecked::<Database>();
        db.users()
            .get_by_id(&self.user_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .map(User::from)
            .ok_or_else(|| {
                ApiError::Internal("vote references a missing user".to_string()).extend()
            })
    }

    /// The link voted for
    async fn link(&self, ctx: &Context<'_>) -> Result<Link> {
        let db = ctx.data_unchecked::<Database>();
        db.links()
            .get_by_id(&self.link_id)
            .await
            .map_err(|e| ApiError::from(e).extend())?
            .map(Link::from)
            .ok_or_else(|| {
                ApiError::Internal("vote references a missing link".to_string()).extend()
            })
    }
}

impl From<VoteRecord> for Vote {
    fn from(r: VoteRecord) -> Self {
        Self {
            id: ID(r.id),
            user_id: r.user_id,
            link_id: r.link_id,
        }
    }
}

/// Signed token plus the user it authenticates, returned by signup and login
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    /// Signed bearer token
    pub token: String,
    /// The authenticated user
    pub user: User,
}
