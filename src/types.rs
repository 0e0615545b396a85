use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Daily tally
// ---------------------------------------------------------------------------

/// Success/failure counts for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchDay {
    pub date: NaiveDate,
    pub success: i64,
    pub failure: i64,
}

/// The `{success, failure}` value exported under each date key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub success: i64,
    pub failure: i64,
}

impl From<&MatchDay> for DayCounts {
    fn from(day: &MatchDay) -> Self {
        Self {
            success: day.success,
            failure: day.failure,
        }
    }
}

impl MatchDay {
    /// Export entry: ISO-8601 date key and its counts.
    pub fn into_entry(self) -> (String, DayCounts) {
        (self.date.format("%Y-%m-%d").to_string(), DayCounts::from(&self))
    }
}

// ---------------------------------------------------------------------------
// Mismatch log
// ---------------------------------------------------------------------------

/// One stored mismatch report. `data` is whatever JSON the client posted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub id: i64,
    pub name: Option<String>,
    pub data: Value,
}
