//! Chart-ready series built from a stats snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ProductionLine, StatsSnapshot};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub rippon_sum: i64,
    pub label_sum: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinePoint {
    pub line: ProductionLine,
    pub rippon_sum: i64,
    pub label_sum: i64,
}

/// Remaining vs. used inventory for the doughnut chart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub rippon_remaining: i64,
    pub labels_remaining: i64,
    pub rippon_capacity: i64,
    pub labels_capacity: i64,
    pub rippon_used: i64,
    pub labels_used: i64,
}

/// Per-day sums ordered by date
pub fn daily_series(stats: &StatsSnapshot) -> Vec<DailyPoint> {
    stats
        .by_date
        .iter()
        .map(|(date, totals)| DailyPoint {
            date: *date,
            rippon_sum: totals.rippon,
            label_sum: totals.labels,
        })
        .collect()
}

/// Per-line sums aligned to [`ProductionLine::ALL`]
pub fn line_series(stats: &StatsSnapshot) -> Vec<LinePoint> {
    ProductionLine::ALL
        .into_iter()
        .map(|line| {
            let totals = stats.by_line.get(&line).copied().unwrap_or_default();
            LinePoint {
                line,
                rippon_sum: totals.rippon,
                label_sum: totals.labels,
            }
        })
        .collect()
}

pub fn inventory_snapshot(stats: &StatsSnapshot) -> InventorySnapshot {
    InventorySnapshot {
        rippon_remaining: stats.inventory.rippon_remaining,
        labels_remaining: stats.inventory.labels_remaining,
        rippon_capacity: stats.inventory.rippon_capacity,
        labels_capacity: stats.inventory.labels_capacity,
        rippon_used: stats.totals.rippon,
        labels_used: stats.totals.labels,
    }
}
