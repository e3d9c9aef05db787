//! Database models for the Material Consumption Tracker
//!
//! Re-exports models from the shared crate and adds the row types read by sqlx

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub use shared::models::*;

use crate::error::AppError;

/// Row of the `consumption_records` table
#[derive(Debug, FromRow)]
pub struct RecordRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub record_date: NaiveDate,
    pub weekday: String,
    pub line: String,
    pub shift_leader: String,
    pub rippon: i32,
    pub labels: i32,
    pub notes: Option<String>,
}

impl TryFrom<RecordRow> for ConsumptionRecord {
    type Error = AppError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let line = row.line.parse::<ProductionLine>().map_err(|_| {
            AppError::Internal(format!("record {} has unknown line '{}'", row.id, row.line))
        })?;

        Ok(ConsumptionRecord {
            id: row.id,
            timestamp: row.created_at,
            day: row.record_date,
            weekday: row.weekday,
            line,
            shift_leader: row.shift_leader,
            rippon: row.rippon,
            labels: row.labels,
            notes: row.notes,
        })
    }
}

/// Convert fetched rows, failing on the first row that is not a valid record
pub fn records_from_rows(rows: Vec<RecordRow>) -> Result<Vec<ConsumptionRecord>, AppError> {
    rows.into_iter().map(ConsumptionRecord::try_from).collect()
}
