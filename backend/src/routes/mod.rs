//! Route definitions for the Material Consumption Tracker

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Record store
        .nest("/records", record_routes())
        // Aggregates
        .route("/stats", get(handlers::get_stats))
        .route("/projection", get(handlers::get_projection))
}

/// Record routes
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_records).post(handlers::create_record))
        .route("/:record_id", delete(handlers::delete_record))
}

/// Export routes
pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/csv", get(handlers::export_csv))
        .route("/json", get(handlers::export_json))
}
