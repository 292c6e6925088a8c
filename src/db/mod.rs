//! Database connection, repositories, and the store change feed

pub mod events;
pub mod links;
pub mod users;
pub mod votes;

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

pub use events::{ChangeFeed, StoreEvent};
pub use links::{CreateLink, LinkRecord, LinksRepository};
pub use users::{CreateUser, UserRecord, UsersRepository};
pub use votes::{CreateVote, VoteRecord, VotesRepository};

/// Current time as an ISO-8601 string, the format timestamps are stored in
pub(crate) fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Whether the store rejected a write for violating a UNIQUE constraint.
/// Used to map duplicate signups and double votes to their typed errors.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Database wrapper providing connection pool and change-feed access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl Database {
    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool, creating the database file
    /// (and its parent directory) if missing.
    pub async fn connect(url: &str) -> Result<Self> {
        let path = url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            feed: ChangeFeed::new(),
        })
    }

    /// In-memory database, used by tests. A single connection keeps every
    /// query on the same in-memory instance.
    #[cfg(test)]
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self {
            pool,
            feed: ChangeFeed::new(),
        })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Get a links repository
    pub fn links(&self) -> LinksRepository {
        LinksRepository::new(self.pool.clone(), self.feed.clone())
    }

    /// Get a votes repository
    pub fn votes(&self) -> VotesRepository {
        VotesRepository::new(self.pool.clone(), self.feed.clone())
    }

    /// Subscribe to create events published by the repositories
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
