//! API Service - Load control API for the ITV station store
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /load?sources=CV,CAT,GAL&dry_run= - Run a load and return the outcome
//! - DELETE /reset - Empty the station tables

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use loader::fetch::SourceFetcher;
use loader::pipeline::run_load;
use loader::record::RunOutcome;
use loader::store::truncate_all;

// ============================================================================
// State
// ============================================================================

struct AppState {
    pool: PgPool,
    fetcher: SourceFetcher,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Query params
// ============================================================================

#[derive(Deserialize)]
struct LoadQuery {
    sources: Option<String>,
    dry_run: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: "0.1.0",
    })
}

/// Runs a load over the requested sources. Per-source failures are captured
/// inside the outcome, so the response is always 200 with the merged report.
async fn load_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoadQuery>,
) -> Json<RunOutcome> {
    let sources = params.sources.unwrap_or_else(|| "CV,CAT,GAL".to_string());
    let dry_run = params.dry_run.unwrap_or(false);
    let outcome = run_load(&state.pool, &state.fetcher, &sources, dry_run).await;
    Json(outcome)
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match truncate_all(&state.pool).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("{e:#}"),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DB_URL").context("DB_URL env var missing")?;
    let bind = std::env::var("API_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    println!("=== ITV Station API ===");
    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    println!("Database connected");

    let state = Arc::new(AppState {
        pool,
        fetcher: SourceFetcher::from_env()?,
    });

    // CORS for web frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/load", post(load_handler))
        .route("/reset", delete(reset_handler))
        .layer(cors)
        .with_state(state);

    println!("API listening on http://{}", bind);
    println!("\nEndpoints:");
    println!("  GET    /health");
    println!("  POST   /load?sources=CV,CAT,GAL&dry_run=");
    println!("  DELETE /reset");

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
