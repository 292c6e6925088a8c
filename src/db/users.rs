//! Users repository

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::now_iso8601;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. A duplicate email surfaces as a unique-constraint
    /// violation from the store.
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(UserRecord {
            id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: now,
        })
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.0,
            email: r.1,
            password_hash: r.2,
            name: r.3,
            created_at: r.4,
        }))
    }

    /// Get user by email (case-insensitive)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE email = ? COLLATE NOCASE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            id: r.0,
            email: r.1,
            password_hash: r.2,
            name: r.3,
            created_at: r.4,
        }))
    }
}
