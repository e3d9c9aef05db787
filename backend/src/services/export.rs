//! CSV export of consumption records

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::ConsumptionRecord;

/// Download name for the CSV export
pub const CSV_FILENAME: &str = "material_consumption.csv";

/// One CSV line; field renames are the column headers
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Day")]
    day: &'a str,
    #[serde(rename = "Production Line")]
    line: &'a str,
    #[serde(rename = "Rippon Used")]
    rippon: i32,
    #[serde(rename = "Labels Used")]
    labels: i32,
    #[serde(rename = "Shift Leader")]
    shift_leader: &'a str,
    #[serde(rename = "Notes")]
    notes: &'a str,
}

impl<'a> From<&'a ConsumptionRecord> for CsvRow<'a> {
    fn from(record: &'a ConsumptionRecord) -> Self {
        Self {
            date: record.day.format("%Y-%m-%d").to_string(),
            day: &record.weekday,
            line: record.line.as_str(),
            rippon: record.rippon,
            labels: record.labels,
            shift_leader: &record.shift_leader,
            notes: record.notes.as_deref().unwrap_or(""),
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Render records as CSV with a header row, in the order given
    pub fn export_to_csv(records: &[ConsumptionRecord]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        if records.is_empty() {
            // serialize() only emits headers alongside the first row
            wtr.write_record([
                "Date",
                "Day",
                "Production Line",
                "Rippon Used",
                "Labels Used",
                "Shift Leader",
                "Notes",
            ])
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        for record in records {
            wtr.serialize(CsvRow::from(record))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{weekday_name, ProductionLine};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn record(notes: Option<&str>) -> ConsumptionRecord {
        let day = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        ConsumptionRecord {
            id: Uuid::new_v4(),
            timestamp: Utc.with_ymd_and_hms(2024, 4, 2, 6, 15, 0).unwrap(),
            day,
            weekday: weekday_name(day),
            line: ProductionLine::Line3,
            shift_leader: "Prasert".to_string(),
            rippon: 6,
            labels: 11,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let csv = ExportService::export_to_csv(&[record(Some("new roll, spliced"))]).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Date,Day,Production Line,Rippon Used,Labels Used,Shift Leader,Notes")
        );
        assert_eq!(
            lines.next(),
            Some("2024-04-02,Tuesday,Line 3,6,11,Prasert,\"new roll, spliced\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_missing_notes_are_empty() {
        let csv = ExportService::export_to_csv(&[record(None)]).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with("Prasert,"));
    }

    #[test]
    fn test_csv_empty_export_has_header() {
        let csv = ExportService::export_to_csv(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "Date,Day,Production Line,Rippon Used,Labels Used,Shift Leader,Notes"
        );
    }
}
