//! Statistics and reorder projection over the full record set

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::RecordService;
use shared::{aggregate, project, Capacities, RecordFilter, ReorderProjection, StatsSnapshot};

/// Stats are recomputed from every record on each call; nothing is cached.
#[derive(Clone)]
pub struct StatsService {
    records: RecordService,
    capacities: Capacities,
}

impl StatsService {
    pub fn new(db: PgPool, capacities: Capacities) -> Self {
        Self {
            records: RecordService::new(db),
            capacities,
        }
    }

    /// Aggregate every stored record
    pub async fn snapshot(&self) -> AppResult<StatsSnapshot> {
        let records = self.records.list(&RecordFilter::default()).await?;
        let stats = aggregate(&records, self.capacities);

        tracing::debug!(
            records = stats.totals.records_count,
            days = stats.by_date.len(),
            rippon_remaining = stats.inventory.rippon_remaining,
            labels_remaining = stats.inventory.labels_remaining,
            "Computed stats snapshot"
        );
        Ok(stats)
    }

    /// Depletion forecast starting at `today`
    pub async fn projection(&self, today: NaiveDate) -> AppResult<ReorderProjection> {
        let stats = self.snapshot().await?;
        let projection = project(&stats, today);

        if let Some(alert) = &projection.stock_alert {
            tracing::warn!(material = %alert.material, percent = %alert.percent, "{}", alert.message);
        }
        Ok(projection)
    }
}
