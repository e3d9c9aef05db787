//! Statistics and projection handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::StatsService;
use crate::AppState;
use shared::{ReorderProjection, StatsSnapshot};

#[derive(Debug, Deserialize)]
pub struct ProjectionQuery {
    /// Start date of the projection, defaults to today (UTC)
    pub today: Option<NaiveDate>,
}

/// Get aggregated statistics
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsSnapshot>> {
    let service = StatsService::new(state.db, state.config.inventory.capacities());
    let stats = service.snapshot().await?;
    Ok(Json(stats))
}

/// Get the 7-day reorder projection
pub async fn get_projection(
    State(state): State<AppState>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
) -> AppResult<Json<ReorderProjection>> {
    let today = projection_start(query, Utc::now().date_naive())?;
    let service = StatsService::new(state.db, state.config.inventory.capacities());
    let projection = service.projection(today).await?;
    Ok(Json(projection))
}

/// Start date from the query, or `fallback` when none was given
fn projection_start(
    query: Result<Query<ProjectionQuery>, QueryRejection>,
    fallback: NaiveDate,
) -> AppResult<NaiveDate> {
    let Query(query) = query.map_err(|rejection| AppError::Validation {
        field: Some("today".to_string()),
        message: format!("Invalid projection query: {}", rejection.body_text()),
    })?;
    Ok(query.today.unwrap_or(fallback))
}
