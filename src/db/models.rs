//! Database row types for the `matches` and `failures` tables.
//! Used by sqlx for typed queries.
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::types::Json;

use crate::types::{FailureRecord, MatchDay};

#[derive(Debug, sqlx::FromRow)]
pub struct MatchDayRow {
    pub date: NaiveDate,
    pub success: i64,
    pub failure: i64,
}

impl From<MatchDayRow> for MatchDay {
    fn from(row: MatchDayRow) -> Self {
        Self {
            date: row.date,
            success: row.success,
            failure: row.failure,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct FailureRow {
    pub id: i64,
    pub name: Option<String>,
    pub data: Json<Value>,
}

impl From<FailureRow> for FailureRecord {
    fn from(row: FailureRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            data: row.data.0,
        }
    }
}
