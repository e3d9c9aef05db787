//! Reorder projection and inventory alerts
//!
//! Two independent alert mechanisms live here:
//! - day-projection alerts, driven by the average daily consumption rate
//!   ([`evaluate_reorder_rules`], [`headline_alert`]);
//! - the stock-level alert, driven only by remaining/capacity
//!   ([`stock_alert`]).

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Averages, InventoryState, StatsSnapshot};
use crate::types::Material;

/// Days projected forward from today (the series has one more point)
pub const PROJECTION_DAYS: u32 = 7;

/// A material running out in fewer days than this needs reordering
pub const REORDER_WINDOW_DAYS: i64 = 7;

/// Depletion estimates above this are shown as "365+"
pub const MAX_DISPLAY_DAYS: i64 = 365;

/// Projected inventory on one day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub projected_rippon: Decimal,
    pub projected_labels: Decimal,
}

/// Whole days until each material is used up at the current rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepletionEstimate {
    pub rippon_days: i64,
    pub labels_days: i64,
}

impl DepletionEstimate {
    pub fn from_inventory(inventory: &InventoryState, averages: &Averages) -> Self {
        Self {
            rippon_days: days_until_depletion(inventory.rippon_remaining, averages.daily_rippon),
            labels_days: days_until_depletion(inventory.labels_remaining, averages.daily_labels),
        }
    }

    pub fn days_for(&self, material: Material) -> i64 {
        match material {
            Material::Rippon => self.rippon_days,
            Material::Labels => self.labels_days,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Info,
}

/// A day-projection alert message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderAlert {
    pub level: AlertLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    pub message: String,
}

impl ReorderAlert {
    fn sufficient() -> Self {
        Self {
            level: AlertLevel::Info,
            material: None,
            days: None,
            message: format!(
                "Both materials have sufficient inventory for at least {} days.",
                REORDER_WINDOW_DAYS
            ),
        }
    }
}

/// One entry of the ordered day-projection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRule {
    pub material: Material,
    pub level: AlertLevel,
}

impl ReorderRule {
    pub fn evaluate(&self, depletion: &DepletionEstimate) -> Option<ReorderAlert> {
        let days = depletion.days_for(self.material);
        if days >= REORDER_WINDOW_DAYS {
            return None;
        }

        let advice = match self.level {
            AlertLevel::Critical => "Reorder immediately.",
            _ => "Consider reordering soon.",
        };
        Some(ReorderAlert {
            level: self.level,
            material: Some(self.material),
            days: Some(days),
            message: format!(
                "{} will run out in approximately {} days. {}",
                self.material,
                display_days(days),
                advice
            ),
        })
    }
}

/// Day-projection rules in precedence order: labels before rippon
pub const REORDER_RULES: [ReorderRule; 2] = [
    ReorderRule {
        material: Material::Labels,
        level: AlertLevel::Critical,
    },
    ReorderRule {
        material: Material::Rippon,
        level: AlertLevel::Warning,
    },
];

/// Every matching rule in precedence order, or the "sufficient" message
pub fn evaluate_reorder_rules(depletion: &DepletionEstimate) -> Vec<ReorderAlert> {
    let alerts: Vec<ReorderAlert> = REORDER_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(depletion))
        .collect();

    if alerts.is_empty() {
        vec![ReorderAlert::sufficient()]
    } else {
        alerts
    }
}

/// The first matching rule, or the "sufficient" message
pub fn headline_alert(depletion: &DepletionEstimate) -> ReorderAlert {
    REORDER_RULES
        .iter()
        .find_map(|rule| rule.evaluate(depletion))
        .unwrap_or_else(ReorderAlert::sufficient)
}

/// Capacity-relative stock alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub material: Material,
    pub percent: Decimal,
    pub message: String,
}

/// Stock-level thresholds in precedence order, as (material, percent below
/// which the alert fires)
pub const STOCK_ALERT_RULES: [(Material, i64); 2] = [(Material::Labels, 10), (Material::Rippon, 20)];

/// Stock-level alert from remaining/capacity alone, `None` when clear
pub fn stock_alert(inventory: &InventoryState) -> Option<StockAlert> {
    STOCK_ALERT_RULES.iter().find_map(|(material, threshold)| {
        let percent = match material {
            Material::Rippon => inventory.rippon_percent(),
            Material::Labels => inventory.labels_percent(),
        };
        (percent < Decimal::from(*threshold)).then(|| StockAlert {
            material: *material,
            percent,
            message: material.reorder_soon_message().to_string(),
        })
    })
}

/// floor(remaining / rate), saturating at the `i64` bounds.
///
/// A non-positive rate means the material never runs out.
pub fn days_until_depletion(remaining: i64, rate: Decimal) -> i64 {
    if rate <= Decimal::ZERO {
        return i64::MAX;
    }
    let saturated = if remaining < 0 { i64::MIN } else { i64::MAX };
    Decimal::from(remaining)
        .checked_div(rate)
        .and_then(|d| d.floor().to_i64())
        .unwrap_or(saturated)
}

/// Render a depletion estimate, capping implausibly large values
pub fn display_days(days: i64) -> String {
    if days > MAX_DISPLAY_DAYS {
        format!("{}+", MAX_DISPLAY_DAYS)
    } else {
        days.to_string()
    }
}

/// Linear depletion series for offsets `0..=PROJECTION_DAYS` starting at `today`
pub fn project_series(
    inventory: &InventoryState,
    averages: &Averages,
    today: NaiveDate,
) -> Vec<ProjectionPoint> {
    (0..=PROJECTION_DAYS)
        .map(|offset| {
            let elapsed = Decimal::from(offset);
            ProjectionPoint {
                date: today + Duration::days(i64::from(offset)),
                projected_rippon: projected_level(
                    inventory.rippon_remaining,
                    averages.daily_rippon,
                    elapsed,
                ),
                projected_labels: projected_level(
                    inventory.labels_remaining,
                    averages.daily_labels,
                    elapsed,
                ),
            }
        })
        .collect()
}

fn projected_level(remaining: i64, rate: Decimal, elapsed: Decimal) -> Decimal {
    (Decimal::from(remaining) - rate * elapsed).max(Decimal::ZERO)
}

/// Full forecast for the reorder panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderProjection {
    pub series: Vec<ProjectionPoint>,
    pub depletion: DepletionEstimate,
    pub headline: ReorderAlert,
    pub details: Vec<ReorderAlert>,
    pub stock_alert: Option<StockAlert>,
}

/// Project the snapshot forward from `today`
pub fn project(stats: &StatsSnapshot, today: NaiveDate) -> ReorderProjection {
    let depletion = DepletionEstimate::from_inventory(&stats.inventory, &stats.averages);

    ReorderProjection {
        series: project_series(&stats.inventory, &stats.averages, today),
        depletion,
        headline: headline_alert(&depletion),
        details: evaluate_reorder_rules(&depletion),
        stock_alert: stock_alert(&stats.inventory),
    }
}
