use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqliteConnection;

use crate::db::models::FailureRow;
use crate::error::Result;
use crate::types::FailureRecord;

/// Appends a mismatch payload to the failure log and returns its new id.
/// The payload is stored as-is; its shape is never inspected.
pub async fn record_failure(conn: &mut SqliteConnection, name: Option<&str>, data: &Value) -> Result<i64> {
    let id = sqlx::query("INSERT INTO failures (name, data) VALUES (?, ?)")
        .bind(name)
        .bind(Json(data))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    Ok(id)
}

/// All failure records, oldest first.
pub async fn fetch_failures(conn: &mut SqliteConnection) -> Result<Vec<FailureRecord>> {
    let rows = sqlx::query_as::<_, FailureRow>("SELECT id, name, data FROM failures ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(FailureRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_pool;
    use serde_json::json;

    #[tokio::test]
    async fn payloads_round_trip_verbatim() {
        let (_dir, pool) = temp_pool(2).await;
        let mut conn = pool.acquire().await.unwrap();

        let payloads = [
            json!({"x": 1, "nested": {"list": [true, null, 2.5]}}),
            json!("just a string"),
            json!(null),
            json!([]),
        ];
        for payload in &payloads {
            record_failure(&mut conn, None, payload).await.unwrap();
        }

        let stored: Vec<Value> = fetch_failures(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data)
            .collect();
        assert_eq!(stored, payloads.to_vec());
    }

    #[tokio::test]
    async fn each_report_gets_a_fresh_increasing_id() {
        let (_dir, pool) = temp_pool(2).await;
        let mut conn = pool.acquire().await.unwrap();

        let first = record_failure(&mut conn, Some("parser"), &json!(1)).await.unwrap();
        let second = record_failure(&mut conn, Some("parser"), &json!(1)).await.unwrap();
        assert!(second > first);

        let records = fetch_failures(&mut conn).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, first);
        assert_eq!(records[1].id, second);
    }

    #[tokio::test]
    async fn name_tag_is_optional() {
        let (_dir, pool) = temp_pool(2).await;
        let mut conn = pool.acquire().await.unwrap();

        record_failure(&mut conn, Some("lexer"), &json!({"a": 1})).await.unwrap();
        record_failure(&mut conn, None, &json!({"b": 2})).await.unwrap();

        let records = fetch_failures(&mut conn).await.unwrap();
        assert_eq!(records[0].name.as_deref(), Some("lexer"));
        assert_eq!(records[1].name, None);
    }
}
