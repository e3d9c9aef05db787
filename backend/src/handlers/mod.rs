//! HTTP handlers for the Material Consumption Tracker

pub mod export;
pub mod health;
pub mod records;
pub mod stats;

pub use export::{export_csv, export_json};
pub use health::health_check;
pub use records::{create_record, delete_record, list_records};
pub use stats::{get_projection, get_stats};
