//! Common types used across the tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ProductionLine;

/// A tracked consumable material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Rippon,
    Labels,
}

impl Material {
    pub fn name(&self) -> &'static str {
        match self {
            Material::Rippon => "Rippon",
            Material::Labels => "Labels",
        }
    }

    /// Banner text for the capacity-relative stock alert
    pub fn reorder_soon_message(&self) -> &'static str {
        match self {
            Material::Rippon => "Rippon needs to be reordered soon.",
            Material::Labels => "Labels need to be reordered soon.",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Filter for listing records. Absent fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<ProductionLine>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.line.is_none()
    }

    /// Query-string pairs in the order the API expects them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(line) = self.line {
            pairs.push(("line", line.as_str().to_string()));
        }
        pairs
    }
}
