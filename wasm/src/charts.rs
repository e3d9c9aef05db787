//! Chart state for the dashboard
//!
//! Each chart owns its labels and datasets and is mutated in place by
//! `update`. The JavaScript side reads [`ChartData`] as JSON and hands it to
//! the rendering library unchanged.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    Capacities, DailyPoint, InventorySnapshot, LinePoint, ProductionLine, ProjectionPoint,
};

/// One named series of values
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
}

impl Dataset {
    fn empty(label: &'static str) -> Self {
        Self {
            label,
            data: Vec::new(),
        }
    }
}

/// Labels plus datasets, in the shape chart renderers consume
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A chart handle updated with a fresh series
pub trait Chart {
    type Series: ?Sized;

    fn update(&mut self, series: &Self::Series);

    fn data(&self) -> &ChartData;

    /// Number of times `update` has been applied
    fn update_count(&self) -> u32;
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Daily consumption trend, one point per recorded date
#[derive(Debug, Clone)]
pub struct DailyTrendChart {
    data: ChartData,
    updates: u32,
}

impl DailyTrendChart {
    pub fn new() -> Self {
        Self {
            data: ChartData {
                labels: Vec::new(),
                datasets: vec![
                    Dataset::empty("Rippon Consumption"),
                    Dataset::empty("Label Consumption"),
                ],
            },
            updates: 0,
        }
    }
}

impl Default for DailyTrendChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for DailyTrendChart {
    type Series = [DailyPoint];

    fn update(&mut self, series: &[DailyPoint]) {
        self.data.labels = series
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect();
        self.data.datasets[0].data = series.iter().map(|p| p.rippon_sum as f64).collect();
        self.data.datasets[1].data = series.iter().map(|p| p.label_sum as f64).collect();
        self.updates += 1;
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update_count(&self) -> u32 {
        self.updates
    }
}

/// Consumption per production line. Labels are fixed to the line enumeration.
#[derive(Debug, Clone)]
pub struct LineConsumptionChart {
    data: ChartData,
    updates: u32,
}

impl LineConsumptionChart {
    pub fn new() -> Self {
        let zeros = vec![0.0; ProductionLine::ALL.len()];
        Self {
            data: ChartData {
                labels: ProductionLine::ALL
                    .iter()
                    .map(|line| line.as_str().to_string())
                    .collect(),
                datasets: vec![
                    Dataset {
                        label: "Rippon Consumption",
                        data: zeros.clone(),
                    },
                    Dataset {
                        label: "Label Consumption",
                        data: zeros,
                    },
                ],
            },
            updates: 0,
        }
    }
}

impl Default for LineConsumptionChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for LineConsumptionChart {
    type Series = [LinePoint];

    fn update(&mut self, series: &[LinePoint]) {
        // A line missing from the series is plotted as zero
        let value_for = |line: ProductionLine, pick: fn(&LinePoint) -> i64| {
            series
                .iter()
                .find(|p| p.line == line)
                .map(|p| pick(p) as f64)
                .unwrap_or(0.0)
        };

        self.data.datasets[0].data = ProductionLine::ALL
            .iter()
            .map(|&line| value_for(line, |p| p.rippon_sum))
            .collect();
        self.data.datasets[1].data = ProductionLine::ALL
            .iter()
            .map(|&line| value_for(line, |p| p.label_sum))
            .collect();
        self.updates += 1;
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update_count(&self) -> u32 {
        self.updates
    }
}

/// Doughnut of remaining versus used inventory
#[derive(Debug, Clone)]
pub struct InventoryChart {
    data: ChartData,
    updates: u32,
}

impl InventoryChart {
    /// Starts full: remaining equals capacity, nothing used
    pub fn new(capacities: Capacities) -> Self {
        Self {
            data: ChartData {
                labels: ["Rippon Remaining", "Labels Remaining", "Rippon Used", "Labels Used"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                datasets: vec![Dataset {
                    label: "Inventory Status",
                    data: vec![capacities.rippon as f64, capacities.labels as f64, 0.0, 0.0],
                }],
            },
            updates: 0,
        }
    }
}

impl Default for InventoryChart {
    fn default() -> Self {
        Self::new(Capacities::default())
    }
}

impl Chart for InventoryChart {
    type Series = InventorySnapshot;

    fn update(&mut self, snapshot: &InventorySnapshot) {
        self.data.datasets[0].data = vec![
            snapshot.rippon_remaining as f64,
            snapshot.labels_remaining as f64,
            snapshot.rippon_used as f64,
            snapshot.labels_used as f64,
        ];
        self.updates += 1;
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update_count(&self) -> u32 {
        self.updates
    }
}

/// Projected inventory over the forecast window
#[derive(Debug, Clone)]
pub struct ProjectionChart {
    data: ChartData,
    updates: u32,
}

impl ProjectionChart {
    pub fn new() -> Self {
        Self {
            data: ChartData {
                labels: Vec::new(),
                datasets: vec![
                    Dataset::empty("Rippon Inventory"),
                    Dataset::empty("Label Inventory"),
                ],
            },
            updates: 0,
        }
    }
}

impl Default for ProjectionChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for ProjectionChart {
    type Series = [ProjectionPoint];

    fn update(&mut self, series: &[ProjectionPoint]) {
        self.data.labels = series
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect();
        self.data.datasets[0].data = series
            .iter()
            .map(|p| decimal_to_f64(p.projected_rippon))
            .collect();
        self.data.datasets[1].data = series
            .iter()
            .map(|p| decimal_to_f64(p.projected_labels))
            .collect();
        self.updates += 1;
    }

    fn data(&self) -> &ChartData {
        &self.data
    }

    fn update_count(&self) -> u32 {
        self.updates
    }
}

/// The four dashboard charts, created together
#[derive(Debug, Clone, Default)]
pub struct Charts {
    pub daily: DailyTrendChart,
    pub lines: LineConsumptionChart,
    pub inventory: InventoryChart,
    pub projection: ProjectionChart,
}

impl Charts {
    pub fn new(capacities: Capacities) -> Self {
        Self {
            daily: DailyTrendChart::new(),
            lines: LineConsumptionChart::new(),
            inventory: InventoryChart::new(capacities),
            projection: ProjectionChart::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_inventory_chart_initial_data() {
        let chart = InventoryChart::default();
        assert_eq!(chart.data().datasets[0].data, vec![50.0, 30.0, 0.0, 0.0]);
        assert_eq!(chart.update_count(), 0);
    }

    #[test]
    fn test_line_chart_fixed_labels() {
        let mut chart = LineConsumptionChart::new();
        assert_eq!(
            chart.data().labels,
            vec!["Line 1", "Line 2", "Line 3", "Line 4", "Line 6", "Line 7"]
        );

        chart.update(&[LinePoint {
            line: ProductionLine::Line4,
            rippon_sum: 7,
            label_sum: 2,
        }]);

        assert_eq!(chart.data().datasets[0].data, vec![0.0, 0.0, 0.0, 7.0, 0.0, 0.0]);
        assert_eq!(chart.data().datasets[1].data, vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(chart.data().labels.len(), 6);
        assert_eq!(chart.update_count(), 1);
    }

    #[test]
    fn test_daily_chart_replaces_data() {
        let mut chart = DailyTrendChart::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        chart.update(&[DailyPoint {
            date,
            rippon_sum: 4,
            label_sum: 1,
        }]);
        chart.update(&[]);

        assert!(chart.data().labels.is_empty());
        assert!(chart.data().datasets[0].data.is_empty());
        assert_eq!(chart.update_count(), 2);
    }

    #[test]
    fn test_projection_chart_iso_labels() {
        let mut chart = ProjectionChart::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        chart.update(&[ProjectionPoint {
            date,
            projected_rippon: Decimal::new(125, 1),
            projected_labels: Decimal::ZERO,
        }]);

        assert_eq!(chart.data().labels, vec!["2024-03-01"]);
        assert_eq!(chart.data().datasets[0].data, vec![12.5]);
    }
}
