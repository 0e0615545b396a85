use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use tower_http::{trace::TraceLayer, validate_request::ValidateRequestHeaderLayer};
use tracing::debug;

use crate::api::{export, health};
use crate::config::Credentials;
use crate::db::{failures, matches};
use crate::error::{AppError, Result};
use crate::json::JsonBody;

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
    /// Largest request body the JSON extractor will buffer.
    pub max_body_bytes: usize,
}

impl ApiState {
    pub fn new(pool: sqlx::SqlitePool, max_body_bytes: usize) -> Self {
        Self { pool, max_body_bytes }
    }
}

pub fn router(state: ApiState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
    Router::new()
        .route("/match/", post(post_match))
        .route("/mismatch-data/", post(post_mismatch_data))
        .route("/get-match-data/", get(export::get_match_data))
        .route("/health", get(health::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(body_limit)
        .with_state(state)
}

/// The full service: the router, behind basic auth when credentials are set.
pub fn app(state: ApiState, auth: Option<&Credentials>) -> Router {
    let router = router(state);
    match auth {
        Some(creds) => router.layer(ValidateRequestHeaderLayer::basic(
            &creds.username,
            &creds.password,
        )),
        None => router,
    }
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct MismatchQuery {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn post_match(
    State(state): State<ApiState>,
    JsonBody(doc): JsonBody,
) -> Result<StatusCode> {
    let Some(doc) = doc else {
        debug!("Empty match body, nothing recorded");
        return Ok(StatusCode::OK);
    };
    let verdict = doc.as_bool().ok_or_else(|| {
        AppError::InvalidDocument("match verdict must be a JSON boolean".to_string())
    })?;

    let today = Local::now().date_naive();
    let mut conn = state.pool.acquire().await?;
    matches::record_match(&mut conn, today, verdict).await?;
    debug!(event = "MATCH", date = %today, verdict, "match recorded");

    Ok(StatusCode::OK)
}

async fn post_mismatch_data(
    State(state): State<ApiState>,
    Query(params): Query<MismatchQuery>,
    JsonBody(doc): JsonBody,
) -> Result<StatusCode> {
    let data = doc.unwrap_or(Value::Null);

    let mut conn = state.pool.acquire().await?;
    let id = failures::record_failure(&mut conn, params.name.as_deref(), &data).await?;
    debug!(event = "MISMATCH", id, name = ?params.name, "failure recorded");

    Ok(StatusCode::OK)
}
