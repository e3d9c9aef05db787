//! Reorder projection tests
//!
//! Tests for the forecast served by `/api/projection`:
//! - linear depletion series, clamped at zero and non-increasing
//! - day-projection alerts with labels taking precedence over rippon
//! - the capacity-relative stock alert, evaluated independently

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    evaluate_reorder_rules, headline_alert, project, project_series, stock_alert, AlertLevel,
    Averages, DepletionEstimate, InventoryState, Material, AVERAGE_RATE_FLOOR, PROJECTION_DAYS,
};

fn inventory(rippon_remaining: i64, labels_remaining: i64) -> InventoryState {
    InventoryState {
        rippon_capacity: 50,
        labels_capacity: 30,
        rippon_remaining,
        labels_remaining,
    }
}

fn rates(rippon: Decimal, labels: Decimal) -> Averages {
    Averages {
        daily_rippon: rippon,
        daily_labels: labels,
    }
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Labels at 20 remaining, 5/day: four days left, critical
    #[test]
    fn test_labels_four_days_left() {
        let inv = inventory(45, 20);
        let depletion =
            DepletionEstimate::from_inventory(&inv, &rates(Decimal::from(1), Decimal::from(5)));

        assert_eq!(depletion.labels_days, 4);
        let headline = headline_alert(&depletion);
        assert_eq!(headline.level, AlertLevel::Critical);
        assert_eq!(headline.material, Some(Material::Labels));

        // rippon is evaluated on its own: 45 days, no warning
        let details = evaluate_reorder_rules(&depletion);
        assert_eq!(details.len(), 1);
    }

    /// Exclusive boundary at seven days
    #[test]
    fn test_seven_day_boundary() {
        let at_six = DepletionEstimate { rippon_days: 30, labels_days: 6 };
        let at_seven = DepletionEstimate { rippon_days: 30, labels_days: 7 };

        assert_eq!(headline_alert(&at_six).level, AlertLevel::Critical);
        assert_eq!(headline_alert(&at_seven).level, AlertLevel::Info);

        let rippon_six = DepletionEstimate { rippon_days: 6, labels_days: 30 };
        let rippon_seven = DepletionEstimate { rippon_days: 7, labels_days: 30 };
        assert_eq!(headline_alert(&rippon_six).level, AlertLevel::Warning);
        assert_eq!(headline_alert(&rippon_seven).level, AlertLevel::Info);
    }

    /// The detail panel shows both messages when both fire
    #[test]
    fn test_both_messages() {
        let both = DepletionEstimate { rippon_days: 1, labels_days: 1 };
        let details = evaluate_reorder_rules(&both);

        assert_eq!(
            details.iter().map(|a| a.material).collect::<Vec<_>>(),
            vec![Some(Material::Labels), Some(Material::Rippon)]
        );
    }

    /// The floor rate keeps estimates finite and displays capped
    #[test]
    fn test_floor_rate_depletion() {
        let depletion = DepletionEstimate::from_inventory(
            &inventory(50, 30),
            &rates(AVERAGE_RATE_FLOOR, AVERAGE_RATE_FLOOR),
        );

        assert_eq!(depletion.rippon_days, 500_000);
        assert_eq!(depletion.labels_days, 300_000);
        assert_eq!(headline_alert(&depletion).level, AlertLevel::Info);
    }

    /// Stock alert thresholds and precedence
    #[test]
    fn test_stock_alert_precedence() {
        // labels 2/30 and rippon 5/50: labels win
        assert_eq!(stock_alert(&inventory(5, 2)).map(|a| a.material), Some(Material::Labels));
        // labels fine, rippon 9/50 = 18%
        assert_eq!(stock_alert(&inventory(9, 25)).map(|a| a.material), Some(Material::Rippon));
        // both healthy
        assert_eq!(stock_alert(&inventory(30, 25)), None);
    }

    /// Full projection of a snapshot
    #[test]
    fn test_project_snapshot() {
        let records: Vec<shared::ConsumptionRecord> = vec![];
        let stats = shared::aggregate(&records, shared::Capacities::default());
        let projection = project(&stats, start());

        assert_eq!(projection.series.len(), PROJECTION_DAYS as usize + 1);
        assert_eq!(projection.series[0].projected_rippon, Decimal::from(50));
        // year boundary
        assert_eq!(projection.series[7].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
        assert_eq!(projection.details.len(), 1);
        assert!(projection.stock_alert.is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn rate_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..100_000).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// Offset zero equals current remaining, clamped at zero
        #[test]
        fn prop_first_point_is_remaining(
            rippon in -1_000i64..10_000,
            labels in -1_000i64..10_000,
            rippon_rate in rate_strategy(),
            labels_rate in rate_strategy()
        ) {
            let series = project_series(&inventory(rippon, labels), &rates(rippon_rate, labels_rate), start());

            prop_assert_eq!(series[0].projected_rippon, Decimal::from(rippon.max(0)));
            prop_assert_eq!(series[0].projected_labels, Decimal::from(labels.max(0)));
        }

        /// Projected levels never increase and never go negative
        #[test]
        fn prop_series_non_increasing(
            rippon in -1_000i64..10_000,
            labels in -1_000i64..10_000,
            rippon_rate in rate_strategy(),
            labels_rate in rate_strategy()
        ) {
            let series = project_series(&inventory(rippon, labels), &rates(rippon_rate, labels_rate), start());

            prop_assert_eq!(series.len(), 8);
            for pair in series.windows(2) {
                prop_assert!(pair[1].projected_rippon <= pair[0].projected_rippon);
                prop_assert!(pair[1].projected_labels <= pair[0].projected_labels);
            }
            prop_assert!(series.iter().all(|p| p.projected_rippon >= Decimal::ZERO));
        }

        /// The critical label alert fires exactly below seven days
        #[test]
        fn prop_label_alert_iff_under_seven_days(
            labels_days in -10i64..30,
            rippon_days in -10i64..30
        ) {
            let depletion = DepletionEstimate { rippon_days, labels_days };
            let headline = headline_alert(&depletion);

            if labels_days < 7 {
                prop_assert_eq!(headline.level, AlertLevel::Critical);
            } else if rippon_days < 7 {
                prop_assert_eq!(headline.level, AlertLevel::Warning);
            } else {
                prop_assert_eq!(headline.level, AlertLevel::Info);
            }
        }

        /// Headline is always the first detail entry
        #[test]
        fn prop_headline_is_first_detail(
            labels_days in -10i64..30,
            rippon_days in -10i64..30
        ) {
            let depletion = DepletionEstimate { rippon_days, labels_days };
            let details = evaluate_reorder_rules(&depletion);

            prop_assert!(!details.is_empty() && details.len() <= 2);
            prop_assert_eq!(&details[0], &headline_alert(&depletion));
        }
    }
}
