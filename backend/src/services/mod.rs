//! Business logic services for the Material Consumption Tracker

pub mod export;
pub mod records;
pub mod stats;

pub use export::ExportService;
pub use records::RecordService;
pub use stats::StatsService;
