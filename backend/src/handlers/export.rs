//! Data export handlers

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::services::{export::CSV_FILENAME, ExportService, RecordService};
use crate::AppState;

/// Download every record as CSV, oldest first
pub async fn export_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = RecordService::new(state.db);
    let records = service.list_chronological().await?;
    let csv = ExportService::export_to_csv(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", CSV_FILENAME),
            ),
        ],
        csv,
    ))
}

/// Every record as JSON, oldest first
pub async fn export_json(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = RecordService::new(state.db);
    let records = service.list_chronological().await?;
    Ok(Json(records))
}
