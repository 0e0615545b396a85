//! `GET /health`: proves a connection can be leased and used, and reports
//! pool occupancy.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::routes::ApiState;
use crate::db::pool::ping;
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Connections currently open, leased or idle.
    pub pool_size: u32,
    pub pool_idle: usize,
}

pub async fn get_health(State(state): State<ApiState>) -> Result<Json<HealthResponse>> {
    {
        let mut conn = state.pool.acquire().await?;
        ping(&mut conn).await?;
    }

    Ok(Json(HealthResponse {
        status: "ok",
        pool_size: state.pool.size(),
        pool_idle: state.pool.num_idle(),
    }))
}
