use chrono::NaiveDate;
use futures_util::{Stream, TryStreamExt};
use sqlx::SqliteConnection;

use crate::db::models::MatchDayRow;
use crate::error::{AppError, Result};
use crate::types::MatchDay;

/// Adds one verdict to the tally for `date`.
///
/// Insert-or-increment happens in a single statement; concurrent writers on
/// the same day are serialized by the engine's conflict handling, so no count
/// is ever lost.
pub async fn record_match(conn: &mut SqliteConnection, date: NaiveDate, verdict: bool) -> Result<()> {
    let success = i64::from(verdict);
    let failure = i64::from(!verdict);

    sqlx::query(
        r#"
        INSERT INTO matches (date, success, failure)
        VALUES (?, ?, ?)
        ON CONFLICT(date) DO UPDATE SET
            success = matches.success + excluded.success,
            failure = matches.failure + excluded.failure
        WHERE matches.date = excluded.date
        "#,
    )
    .bind(date)
    .bind(success)
    .bind(failure)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Streams every daily tally straight off the cursor, oldest day first.
/// Rows are decoded one at a time as the consumer pulls them.
pub fn stream_match_days<'c>(
    conn: &'c mut SqliteConnection,
) -> impl Stream<Item = Result<MatchDay>> + Send + 'c {
    sqlx::query_as::<_, MatchDayRow>("SELECT date, success, failure FROM matches ORDER BY date")
        .fetch(conn)
        .map_ok(MatchDay::from)
        .map_err(AppError::from)
}
