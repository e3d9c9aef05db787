//! Statistics aggregation tests
//!
//! Tests for the stats snapshot served by `/api/stats`:
//! - totals agree with the per-date and per-line breakdowns
//! - every production line is always reported
//! - remaining inventory is capacity minus consumption, unclamped
//! - daily averages never divide by zero

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    aggregate, daily_series, inventory_snapshot, line_series, weekday_name, Capacities,
    ConsumptionRecord, ProductionLine, AVERAGE_RATE_FLOOR,
};
use uuid::Uuid;

fn record(
    date: NaiveDate,
    line: ProductionLine,
    rippon: i32,
    labels: i32,
) -> ConsumptionRecord {
    ConsumptionRecord {
        id: Uuid::new_v4(),
        timestamp: Utc
            .from_utc_datetime(&date.and_hms_opt(7, 0, 0).unwrap()),
        day: date,
        weekday: weekday_name(date),
        line,
        shift_leader: "Shift Leader".to_string(),
        rippon,
        labels,
        notes: None,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Single record against the default capacities
    #[test]
    fn test_single_record_totals_and_inventory() {
        let records = vec![record(day(1), ProductionLine::Line1, 10, 5)];
        let stats = aggregate(&records, Capacities { rippon: 50, labels: 30 });

        assert_eq!(stats.totals.rippon, 10);
        assert_eq!(stats.totals.labels, 5);
        assert_eq!(stats.inventory.rippon_remaining, 40);
        assert_eq!(stats.inventory.labels_remaining, 25);
    }

    /// Two records on the same day collapse into one date bucket
    #[test]
    fn test_same_day_two_lines() {
        let records = vec![
            record(day(3), ProductionLine::Line2, 4, 1),
            record(day(3), ProductionLine::Line3, 6, 2),
        ];
        let stats = aggregate(&records, Capacities::default());

        assert_eq!(stats.by_date.len(), 1);
        assert_eq!(stats.by_date[&day(3)].rippon, 10);
        assert_eq!(stats.by_date[&day(3)].labels, 3);
        assert_eq!(stats.by_line[&ProductionLine::Line2].rippon, 4);
        assert_eq!(stats.by_line[&ProductionLine::Line3].rippon, 6);
    }

    /// Empty record set
    #[test]
    fn test_no_records() {
        let records: Vec<ConsumptionRecord> = vec![];
        let stats = aggregate(&records, Capacities::default());

        assert_eq!(stats.totals.records_count, 0);
        assert!(stats.by_date.is_empty());
        assert_eq!(stats.by_line.len(), 6);
        assert_eq!(stats.inventory.rippon_remaining, 50);
        assert_eq!(stats.averages.daily_rippon, AVERAGE_RATE_FLOOR);
        assert_eq!(stats.averages.daily_labels, AVERAGE_RATE_FLOOR);
    }

    /// Consumption past capacity is representable
    #[test]
    fn test_over_capacity() {
        let records = vec![
            record(day(1), ProductionLine::Line1, 40, 20),
            record(day(2), ProductionLine::Line1, 40, 20),
        ];
        let stats = aggregate(&records, Capacities::default());

        assert_eq!(stats.inventory.rippon_remaining, -30);
        assert_eq!(stats.inventory.labels_remaining, -10);
        assert_eq!(inventory_snapshot(&stats).rippon_used, 80);
    }

    /// Averages use distinct days, not record count
    #[test]
    fn test_average_over_distinct_days() {
        let records = vec![
            record(day(1), ProductionLine::Line1, 3, 3),
            record(day(1), ProductionLine::Line2, 3, 3),
            record(day(1), ProductionLine::Line4, 3, 3),
            record(day(2), ProductionLine::Line6, 1, 1),
        ];
        let stats = aggregate(&records, Capacities::default());

        assert_eq!(stats.averages.daily_rippon, Decimal::from(5));
        assert_eq!(stats.averages.daily_labels, Decimal::from(5));
    }

    /// Chart series follow the snapshot
    #[test]
    fn test_series_views() {
        let records = vec![
            record(day(5), ProductionLine::Line7, 2, 2),
            record(day(4), ProductionLine::Line1, 1, 1),
        ];
        let stats = aggregate(&records, Capacities::default());

        let daily = daily_series(&stats);
        assert_eq!(daily.iter().map(|p| p.date).collect::<Vec<_>>(), vec![day(4), day(5)]);

        let lines = line_series(&stats);
        assert_eq!(
            lines.iter().map(|p| p.line).collect::<Vec<_>>(),
            ProductionLine::ALL.to_vec()
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn line_strategy() -> impl Strategy<Value = ProductionLine> {
        prop::sample::select(ProductionLine::ALL.to_vec())
    }

    fn record_strategy() -> impl Strategy<Value = ConsumptionRecord> {
        (1u32..=28, line_strategy(), 0i32..10_000, 0i32..10_000)
            .prop_map(|(d, line, rippon, labels)| record(day(d), line, rippon, labels))
    }

    proptest! {
        /// Totals equal the sum over dates and the sum over lines
        #[test]
        fn prop_totals_cross_consistent(
            records in prop::collection::vec(record_strategy(), 0..60)
        ) {
            let stats = aggregate(&records, Capacities::default());

            let rippon: i64 = records.iter().map(|r| i64::from(r.rippon)).sum();
            let labels: i64 = records.iter().map(|r| i64::from(r.labels)).sum();
            prop_assert_eq!(stats.totals.rippon, rippon);
            prop_assert_eq!(stats.totals.labels, labels);
            prop_assert_eq!(stats.totals.records_count, records.len());

            let by_date_rippon: i64 = stats.by_date.values().map(|t| t.rippon).sum();
            let by_line_rippon: i64 = stats.by_line.values().map(|t| t.rippon).sum();
            let by_date_labels: i64 = stats.by_date.values().map(|t| t.labels).sum();
            let by_line_labels: i64 = stats.by_line.values().map(|t| t.labels).sum();
            prop_assert_eq!(by_date_rippon, rippon);
            prop_assert_eq!(by_line_rippon, rippon);
            prop_assert_eq!(by_date_labels, labels);
            prop_assert_eq!(by_line_labels, labels);
        }

        /// Every line is present regardless of input
        #[test]
        fn prop_by_line_has_every_line(
            records in prop::collection::vec(record_strategy(), 0..20)
        ) {
            let stats = aggregate(&records, Capacities::default());
            let lines: Vec<ProductionLine> = stats.by_line.keys().copied().collect();
            prop_assert_eq!(lines, ProductionLine::ALL.to_vec());
        }

        /// Input order does not change the result
        #[test]
        fn prop_order_independent(
            records in prop::collection::vec(record_strategy(), 0..30)
        ) {
            let mut reversed = records.clone();
            reversed.reverse();

            prop_assert_eq!(
                aggregate(&records, Capacities::default()),
                aggregate(&reversed, Capacities::default())
            );
        }

        /// Remaining is exactly capacity minus total, even when negative
        #[test]
        fn prop_remaining_exact(
            records in prop::collection::vec(record_strategy(), 0..20),
            rippon_capacity in 0i64..100_000,
            labels_capacity in 0i64..100_000
        ) {
            let capacities = Capacities { rippon: rippon_capacity, labels: labels_capacity };
            let stats = aggregate(&records, capacities);

            prop_assert_eq!(stats.inventory.rippon_remaining, rippon_capacity - stats.totals.rippon);
            prop_assert_eq!(stats.inventory.labels_remaining, labels_capacity - stats.totals.labels);
            prop_assert!(stats.inventory.rippon_remaining <= rippon_capacity);
        }

        /// Averages are always strictly positive
        #[test]
        fn prop_averages_positive(
            records in prop::collection::vec(record_strategy(), 0..20)
        ) {
            let stats = aggregate(&records, Capacities::default());
            prop_assert!(stats.averages.daily_rippon > Decimal::ZERO);
            prop_assert!(stats.averages.daily_labels > Decimal::ZERO);
        }
    }
}
