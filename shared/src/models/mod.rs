//! Domain models for the Material Consumption Tracker

mod projection;
mod record;
mod series;
mod stats;

pub use projection::*;
pub use record::*;
pub use series::*;
pub use stats::*;
