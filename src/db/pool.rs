use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use tracing::info;

use crate::error::Result;

/// How long a writer waits on a locked database before the statement fails.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the connection pool and applies the embedded migrations.
///
/// Connections are leased with `pool.acquire()` and go back to the pool when
/// the returned guard is dropped. Once `max` connections are checked out,
/// `acquire` waits for one to come back.
pub async fn open(database_url: &str, min: u32, max: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    open_with(options, min, max).await
}

pub async fn open_with(options: SqliteConnectOptions, min: u32, max: u32) -> Result<SqlitePool> {
    let options = options
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .min_connections(min)
        .max_connections(max)
        .connect_with(options)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(min, max, "Database pool ready");

    Ok(pool)
}

/// Round-trips a trivial statement on a leased connection.
pub async fn ping(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("SELECT 1").execute(&mut *conn).await?;
    Ok(())
}
