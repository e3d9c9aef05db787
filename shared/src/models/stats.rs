//! Consumption statistics derived from the full record set

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ConsumptionRecord, ProductionLine};

/// Daily rate reported for a material with no recorded consumption.
///
/// Keeps days-until-depletion finite: 0.0001 units/day.
pub const AVERAGE_RATE_FLOOR: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Configured starting inventory per material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Capacities {
    pub rippon: i64,
    pub labels: i64,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            rippon: 50,
            labels: 30,
        }
    }
}

/// Rippon and label sums for one grouping key
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialTotals {
    pub rippon: i64,
    pub labels: i64,
}

impl MaterialTotals {
    fn add(&mut self, record: &ConsumptionRecord) {
        self.rippon += i64::from(record.rippon);
        self.labels += i64::from(record.labels);
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub rippon: i64,
    pub labels: i64,
    pub records_count: usize,
}

/// Remaining inventory against configured capacity.
///
/// Remaining is not clamped: consumption past capacity shows up negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryState {
    pub rippon_capacity: i64,
    pub labels_capacity: i64,
    pub rippon_remaining: i64,
    pub labels_remaining: i64,
}

impl InventoryState {
    pub fn new(capacities: Capacities, consumed: MaterialTotals) -> Self {
        Self {
            rippon_capacity: capacities.rippon,
            labels_capacity: capacities.labels,
            rippon_remaining: capacities.rippon - consumed.rippon,
            labels_remaining: capacities.labels - consumed.labels,
        }
    }

    /// Remaining rippon as a percentage of capacity, floored at zero
    pub fn rippon_percent(&self) -> Decimal {
        percent_of(self.rippon_remaining, self.rippon_capacity)
    }

    /// Remaining labels as a percentage of capacity, floored at zero
    pub fn labels_percent(&self) -> Decimal {
        percent_of(self.labels_remaining, self.labels_capacity)
    }
}

fn percent_of(remaining: i64, capacity: i64) -> Decimal {
    if capacity <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(remaining) * Decimal::ONE_HUNDRED / Decimal::from(capacity)).max(Decimal::ZERO)
}

/// Average consumption per observed day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub daily_rippon: Decimal,
    pub daily_labels: Decimal,
}

/// Everything the dashboard shows, computed in one pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub totals: Totals,
    pub by_date: BTreeMap<NaiveDate, MaterialTotals>,
    pub by_line: BTreeMap<ProductionLine, MaterialTotals>,
    pub inventory: InventoryState,
    pub averages: Averages,
}

/// Aggregate records into a [`StatsSnapshot`].
///
/// Order of `records` does not affect the result. Every production line is
/// present in `by_line`, with zero sums if it has no records.
pub fn aggregate<'a, I>(records: I, capacities: Capacities) -> StatsSnapshot
where
    I: IntoIterator<Item = &'a ConsumptionRecord>,
{
    let mut totals = Totals::default();
    let mut by_date: BTreeMap<NaiveDate, MaterialTotals> = BTreeMap::new();
    let mut by_line: BTreeMap<ProductionLine, MaterialTotals> = ProductionLine::ALL
        .into_iter()
        .map(|line| (line, MaterialTotals::default()))
        .collect();

    for record in records {
        totals.rippon += i64::from(record.rippon);
        totals.labels += i64::from(record.labels);
        totals.records_count += 1;

        by_date.entry(record.day).or_default().add(record);
        by_line.entry(record.line).or_default().add(record);
    }

    let consumed = MaterialTotals {
        rippon: totals.rippon,
        labels: totals.labels,
    };
    let days = by_date.len();

    StatsSnapshot {
        totals,
        by_date,
        by_line,
        inventory: InventoryState::new(capacities, consumed),
        averages: Averages {
            daily_rippon: daily_rate(totals.rippon, days),
            daily_labels: daily_rate(totals.labels, days),
        },
    }
}

/// Average per day over `days` distinct days, or [`AVERAGE_RATE_FLOOR`] when
/// nothing has been consumed
pub fn daily_rate(total: i64, days: usize) -> Decimal {
    if total <= 0 {
        return AVERAGE_RATE_FLOOR;
    }
    let days = Decimal::from(days.max(1));
    Decimal::from(total) / days
}
