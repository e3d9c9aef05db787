//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
    /// Stored records, when the database answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<i64>,
}

/// Reports `degraded` instead of failing when the record table is unreachable
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM consumption_records")
        .fetch_one(&state.db)
        .await;

    let (status, database, records) = match count {
        Ok(n) => ("healthy", "connected", Some(n)),
        Err(e) => {
            tracing::warn!(error = %e, "Record table unreachable during health check");
            ("degraded", "disconnected", None)
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
        records,
    })
}
