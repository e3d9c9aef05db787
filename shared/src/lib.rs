//! Shared types and models for the Material Consumption Tracker
//!
//! This crate contains the domain model, the statistics aggregation and the
//! reorder projection. It is used by the backend, the dashboard (via WASM),
//! and the test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
