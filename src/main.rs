//! Linknest Backend - GraphQL API for a Hackernews-style link aggregator
//!
//! This is the main entry point for the Linknest backend.
//! All operations are exposed via GraphQL at /graphql; subscriptions run
//! over WebSocket at /graphql/ws.

mod api;
mod config;
mod db;
mod error;
mod graphql;
mod services;

use std::net::SocketAddr;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::WebSocketUpgrade;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::graphql::{LinknestSchema, RequestAuth};
use crate::services::{AuthConfig, AuthService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub schema: LinknestSchema,
    pub auth: AuthService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; a missing APP_SECRET stops the process here.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linknest=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Linknest Backend");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database connected and migrated");

    // The signing secret is read from config exactly once, here.
    let auth = AuthService::new(AuthConfig::from(&config));

    let schema = graphql::build_schema(db.clone(), auth.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState { db, schema, auth };

    // Build router - GraphQL is the primary API
    let app = Router::new()
        // Health endpoints (no auth required)
        .merge(api::health::router())
        // GraphQL endpoint (handles all queries and mutations)
        .route("/graphql", get(graphiql).post(graphql_handler))
        // GraphQL WebSocket endpoint for subscriptions
        .route("/graphql/ws", get(graphql_ws_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Extract bearer token from Authorization header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| h.starts_with("Bearer "))
        .map(|h| h[7..].to_string())
}

/// Resolve the bearer token (if any) to the per-request auth value.
/// Never fails the request; resolvers decide what absence or an invalid
/// token means for each operation.
fn resolve_auth(auth: &AuthService, token: Option<String>) -> RequestAuth {
    match token {
        None => RequestAuth::Anonymous,
        Some(token) => match auth.validate_token(&token) {
            Ok(subject) => RequestAuth::Subject(subject),
            Err(_) => RequestAuth::Invalid,
        },
    }
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = req
        .into_inner()
        .data(resolve_auth(&state.auth, extract_token(&headers)));

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    // Check if this is a browser request (accepts HTML)
    let accepts_html = headers
        .get(axum::http::header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        // Return a helpful JSON error for non-browser requests
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// GraphQL WebSocket handler for subscriptions with auth
async fn graphql_ws_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    headers: HeaderMap,
    protocol: async_graphql_axum::GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Extract auth from headers for the initial connection
    let header_auth = resolve_auth(&state.auth, extract_token(&headers));
    let auth_service = state.auth.clone();

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let mut data = async_graphql::Data::default();
            data.insert(header_auth);

            async_graphql_axum::GraphQLWebSocket::new(socket, state.schema.clone(), protocol)
                .with_data(data)
                // Handle connection_init for auth via payload
                .on_connection_init(move |params| async move {
                    if let Some(token) = params
                        .get("Authorization")
                        .or_else(|| params.get("authorization"))
                        .and_then(|v| v.as_str())
                    {
                        let token = token.strip_prefix("Bearer ").unwrap_or(token);
                        let mut data = async_graphql::Data::default();
                        data.insert(resolve_auth(&auth_service, Some(token.to_string())));
                        return Ok(data);
                    }
                    Ok(async_graphql::Data::default())
                })
                .serve()
        })
}
