//! Consumption record models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::ValidationError;

/// Production lines that consume material.
///
/// Variants are declared in display order; `Ord` follows that order so maps
/// keyed by line iterate the way charts label them. There is no Line 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductionLine {
    #[serde(rename = "Line 1")]
    Line1,
    #[serde(rename = "Line 2")]
    Line2,
    #[serde(rename = "Line 3")]
    Line3,
    #[serde(rename = "Line 4")]
    Line4,
    #[serde(rename = "Line 6")]
    Line6,
    #[serde(rename = "Line 7")]
    Line7,
}

impl ProductionLine {
    pub const ALL: [ProductionLine; 6] = [
        ProductionLine::Line1,
        ProductionLine::Line2,
        ProductionLine::Line3,
        ProductionLine::Line4,
        ProductionLine::Line6,
        ProductionLine::Line7,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionLine::Line1 => "Line 1",
            ProductionLine::Line2 => "Line 2",
            ProductionLine::Line3 => "Line 3",
            ProductionLine::Line4 => "Line 4",
            ProductionLine::Line6 => "Line 6",
            ProductionLine::Line7 => "Line 7",
        }
    }
}

impl std::fmt::Display for ProductionLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProductionLine {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ProductionLine::ALL
            .into_iter()
            .find(|line| line.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownLine(trimmed.to_string()))
    }
}

/// A logged per-shift consumption of rippon and labels.
///
/// Records are never updated after creation, only deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Calendar date of `timestamp` (UTC), the grouping key for daily stats
    pub day: NaiveDate,
    /// English weekday name of `day`
    pub weekday: String,
    pub line: ProductionLine,
    pub shift_leader: String,
    pub rippon: i32,
    pub labels: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ConsumptionRecord {
    /// Notes as shown in the detail popup
    pub fn notes_or_default(&self) -> &str {
        self.notes
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("No notes provided")
    }
}

/// Weekday name for a date, e.g. "Monday"
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Input for creating a consumption record.
///
/// Accepts both the submission form field names (`productionLine`,
/// `ripponAmount`, `labelAmount`) and the record field names. Quantities may
/// be JSON numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(alias = "productionLine")]
    pub line: ProductionLine,

    #[validate(length(min = 1, max = 100, message = "Shift leader must be 1 to 100 characters"))]
    pub shift_leader: String,

    #[serde(alias = "ripponAmount", deserialize_with = "deserialize_quantity")]
    #[validate(range(min = 0, message = "Rippon amount cannot be negative"))]
    pub rippon: i32,

    #[serde(alias = "labelAmount", deserialize_with = "deserialize_quantity")]
    #[validate(range(min = 0, message = "Label amount cannot be negative"))]
    pub labels: i32,

    #[serde(default)]
    pub notes: Option<String>,
}

impl NewRecord {
    /// Trim free text, drop empty notes and run field validation
    pub fn prepare(self) -> Result<Self, ValidationError> {
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let record = Self {
            shift_leader: self.shift_leader.trim().to_string(),
            notes,
            ..self
        };

        record.validate().map_err(ValidationError::from)?;
        Ok(record)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(i64),
    Text(String),
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Number(n) => i32::try_from(n)
            .map_err(|_| D::Error::custom(format!("quantity {} is out of range", n))),
        RawQuantity::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| D::Error::custom(format!("quantity '{}' is not a whole number", s))),
    }
}
