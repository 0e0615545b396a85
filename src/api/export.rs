//! `GET /get-match-data/`: every daily tally and every mismatch report in
//! one JSON document.
//!
//! Failures are read first and held in memory. The tallies are then pulled
//! from the cursor on the same leased connection and written to the client
//! row by row, so the stats map is never buffered whole.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use sqlx::SqliteConnection;
use tracing::{error, info, warn};

use crate::api::routes::ApiState;
use crate::config::STREAM_CHANNEL_CAPACITY;
use crate::db::{failures, matches};
use crate::error::{AppError, Result};
use crate::json::{streamed_body, ChunkWriter};
use crate::types::{FailureRecord, MatchDay};

pub async fn get_match_data(State(state): State<ApiState>) -> Result<Response> {
    let mut conn = state.pool.acquire().await?;
    let failures = failures::fetch_failures(&mut conn).await?;

    let (writer, body) = streamed_body(STREAM_CHANNEL_CAPACITY);

    // The task owns the leased connection; it goes back to the pool when the
    // task ends, however it ends.
    tokio::spawn(async move {
        match write_export(&writer, &mut conn, &failures).await {
            Ok(days) => info!(
                event = "EXPORT",
                days,
                failures = failures.len(),
                "match data exported"
            ),
            Err(AppError::ClientGone) => warn!("Client disconnected during export"),
            Err(e) => {
                error!("Export failed mid-stream: {e}");
                writer.abort(&e).await;
            }
        }
    });

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn write_export(
    writer: &ChunkWriter,
    conn: &mut SqliteConnection,
    failures: &[FailureRecord],
) -> Result<usize> {
    writer.raw(r#"{"stats":"#).await?;
    let entries = matches::stream_match_days(conn).map_ok(MatchDay::into_entry);
    let days = writer.map(entries).await?;
    writer.raw(r#","failures":"#).await?;
    writer.value(failures).await?;
    writer.raw("}").await?;
    Ok(days)
}
