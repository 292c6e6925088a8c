//! Links repository

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::events::{ChangeFeed, StoreEvent};
use super::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub url: String,
    pub description: String,
    pub posted_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateLink {
    pub url: String,
    pub description: String,
    pub posted_by: String,
}

pub struct LinksRepository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl LinksRepository {
    pub fn new(pool: SqlitePool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    /// Create a new link and publish it on the change feed
    pub async fn create(&self, link: CreateLink) -> Result<LinkRecord, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            "INSERT INTO links (id, url, description, posted_by, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&link.url)
        .bind(&link.description)
        .bind(&link.posted_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let record = LinkRecord {
            id,
            url: link.url,
            description: link.description,
            posted_by: link.posted_by,
            created_at: now,
        };

        self.feed.publish(StoreEvent::LinkCreated(record.clone()));

        Ok(record)
    }

    /// Get link by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<LinkRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, url, description, posted_by, created_at FROM links WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::from_row))
    }

    /// List links, oldest first, optionally substring-filtered on url or
    /// description and offset/limit paginated.
    pub async fn list(
        &self,
        filter: Option<&str>,
        skip: i64,
        first: Option<i64>,
    ) -> Result<Vec<LinkRecord>, sqlx::Error> {
        let mut sql = String::from("SELECT id, url, description, posted_by, created_at FROM links");
        if filter.is_some() {
            sql.push_str(" WHERE url LIKE ? OR description LIKE ?");
        }
        // SQLite requires a LIMIT clause before OFFSET; -1 means unlimited.
        sql.push_str(" ORDER BY created_at, id LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, (String, String, String, String, String)>(&sql);
        if let Some(filter) = filter {
            let pattern = format!("%{}%", filter);
            query = query.bind(pattern.clone()).bind(pattern);
        }
        let rows = query
            .bind(first.unwrap_or(-1))
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    /// List links posted by a user, oldest first
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<LinkRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, url, description, posted_by, created_at FROM links WHERE posted_by = ? ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    fn from_row(r: (String, String, String, String, String)) -> LinkRecord {
        LinkRecord {
            id: r.0,
            url: r.1,
            description: r.2,
            posted_by: r.3,
            created_at: r.4,
        }
    }
}
