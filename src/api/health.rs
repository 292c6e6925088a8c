//! Health check endpoints

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub database: bool,
}

/// Liveness: the process is up
async fn healthz() -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness: the store answers queries
async fn readyz(State(state): State<AppState>) -> Json<Readiness> {
    let database = sqlx::query("SELECT 1")
        .fetch_one(state.db.pool())
        .await
        .is_ok();

    Json(Readiness {
        ready: database,
        database,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
