//! Record store service: create, list and delete consumption records

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{records_from_rows, weekday_name, ConsumptionRecord, NewRecord, RecordRow};
use shared::RecordFilter;

const RECORD_COLUMNS: &str =
    "id, created_at, record_date, weekday, line, shift_leader, rippon, labels, notes";

/// Record service backed by the `consumption_records` table
#[derive(Clone)]
pub struct RecordService {
    db: PgPool,
}

impl RecordService {
    /// Create a new RecordService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Store a new record. Id, timestamp and day are assigned here.
    pub async fn create(&self, input: NewRecord) -> AppResult<ConsumptionRecord> {
        let input = input.prepare()?;

        let now = Utc::now();
        let day = now.date_naive();

        let row = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            INSERT INTO consumption_records (
                created_at, record_date, weekday, line, shift_leader, rippon, labels, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(now)
        .bind(day)
        .bind(weekday_name(day))
        .bind(input.line.as_str())
        .bind(&input.shift_leader)
        .bind(input.rippon)
        .bind(input.labels)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        let record = ConsumptionRecord::try_from(row)?;
        tracing::info!(
            record_id = %record.id,
            line = %record.line,
            rippon = record.rippon,
            labels = record.labels,
            "Consumption record created"
        );
        Ok(record)
    }

    /// List records newest first, optionally filtered by day and line
    pub async fn list(&self, filter: &RecordFilter) -> AppResult<Vec<ConsumptionRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            r#"
            SELECT {}
            FROM consumption_records
            WHERE ($1::date IS NULL OR record_date = $1)
              AND ($2::text IS NULL OR line = $2)
            ORDER BY created_at DESC
            "#,
            RECORD_COLUMNS
        ))
        .bind(filter.date)
        .bind(filter.line.map(|line| line.as_str()))
        .fetch_all(&self.db)
        .await?;

        records_from_rows(rows)
    }

    /// Every record, oldest first (used for exports)
    pub async fn list_chronological(&self) -> AppResult<Vec<ConsumptionRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {} FROM consumption_records ORDER BY created_at ASC",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        records_from_rows(rows)
    }

    /// Delete a record by id
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM consumption_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record".to_string()));
        }

        tracing::info!(record_id = %id, "Consumption record deleted");
        Ok(())
    }
}
