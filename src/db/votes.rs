//! Votes repository
//!
//! The `UNIQUE(user_id, link_id)` constraint in the votes table is the
//! source of truth for the one-vote-per-link invariant; callers treat a
//! unique violation from [create](VotesRepository::create) as "already
//! voted" even when their own existence check passed.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::events::{ChangeFeed, StoreEvent};
use super::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: String,
    pub user_id: String,
    pub link_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateVote {
    pub user_id: String,
    pub link_id: String,
}

pub struct VotesRepository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl VotesRepository {
    pub fn new(pool: SqlitePool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    /// Create a new vote and publish it on the change feed
    pub async fn create(&self, vote: CreateVote) -> Result<VoteRecord, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query("INSERT INTO votes (id, user_id, link_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&vote.user_id)
            .bind(&vote.link_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        let record = VoteRecord {
            id,
            user_id: vote.user_id,
            link_id: vote.link_id,
            created_at: now,
        };

        self.feed.publish(StoreEvent::VoteCreated(record.clone()));

        Ok(record)
    }

    /// Whether a vote by this user for this link already exists
    pub async fn exists(&self, user_id: &str, link_id: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT 1 FROM votes WHERE user_id = ? AND link_id = ?",
        )
        .bind(user_id)
        .bind(link_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// List votes for a link, oldest first
    pub async fn list_by_link(&self, link_id: &str) -> Result<Vec<VoteRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, String, String, String)>(
            "SELECT id, user_id, link_id, created_at FROM votes WHERE link_id = ? ORDER BY created_at, id",
        )
        .bind(link_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VoteRecord {
                id: r.0,
                user_id: r.1,
                link_id: r.2,
                created_at: r.3,
            })
            .collect())
    }
}
