//! HTTP handlers for consumption record endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ConsumptionRecord, NewRecord, ProductionLine};
use crate::services::RecordService;
use crate::AppState;
use shared::RecordFilter;

/// Query parameters for listing records. Empty values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    pub date: Option<String>,
    pub line: Option<String>,
}

impl RecordQuery {
    pub fn into_filter(self) -> AppResult<RecordFilter> {
        let date = non_empty(self.date)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| AppError::Validation {
                    field: Some("date".to_string()),
                    message: format!("Invalid date '{}', expected YYYY-MM-DD", d),
                })
            })
            .transpose()?;
        let line = non_empty(self.line)
            .map(|l| l.parse::<ProductionLine>())
            .transpose()?;

        Ok(RecordFilter { date, line })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// List records, newest first
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<ConsumptionRecord>>> {
    let filter = query.into_filter()?;
    let service = RecordService::new(state.db);
    let records = service.list(&filter).await?;
    Ok(Json(records))
}

/// Create a record
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<NewRecord>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ConsumptionRecord>)> {
    let Json(input) = payload.map_err(|rejection| AppError::Validation {
        field: None,
        message: format!("Missing required fields: {}", rejection.body_text()),
    })?;

    let service = RecordService::new(state.db);
    let record = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete a record
pub async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let service = RecordService::new(state.db);
    service.delete(record_id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
