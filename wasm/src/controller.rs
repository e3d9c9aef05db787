//! Dashboard controller
//!
//! Owns the UI state (active section, history filter, record lists, stats
//! panel, charts) and wires user actions to the record store. A refresh
//! fetches all of its data before assigning any of it, so a failed request
//! leaves the previously visible state in place.
//!
//! Each action is split into a synchronous start, the store request, and a
//! synchronous finish. [`DashboardHandle`] uses that split to share one
//! controller between concurrent browser callbacks without holding a borrow
//! across a request.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    daily_series, inventory_snapshot, line_series, project, Capacities, ConsumptionRecord,
    NewRecord, ProductionLine, RecordFilter, ReorderProjection, StatsSnapshot, SubmissionForm,
    ValidationError,
};
use std::{cell::RefCell, rc::Rc, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use crate::charts::{Chart, Charts};
use crate::store::{RecordStore, StoreError, StoreResult};

/// Rows shown in the recent-records table
pub const RECENT_LIMIT: usize = 5;

pub const SAVE_FAILED_MESSAGE: &str = "Error saving record";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete";
pub const LOAD_FAILED_MESSAGE: &str = "Network error";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this record?";
pub const NO_NOTES: &str = "No notes provided";

/// Dashboard errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Dashboard is busy")]
    Busy,
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Top-level dashboard sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Tracker,
    Dashboard,
    History,
    Reorder,
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tracker" => Ok(Section::Tracker),
            "dashboard" => Ok(Section::Dashboard),
            "history" => Ok(Section::History),
            "reorder" => Ok(Section::Reorder),
            other => Err(format!("Unknown section: {}", other)),
        }
    }
}

/// Statistics with the forecast derived from them
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsPanel {
    pub stats: StatsSnapshot,
    pub projection: ReorderProjection,
}

/// History query captured when a request starts.
///
/// `generation` is bumped on every filter change; a response for an older
/// generation no longer matches the visible filter and is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryRequest {
    filter: RecordFilter,
    generation: u64,
}

/// Everything a full refresh fetched
#[derive(Debug)]
struct RefreshData {
    recent: Vec<ConsumptionRecord>,
    stats: StatsSnapshot,
    history: Vec<ConsumptionRecord>,
}

/// Recent list, then stats, then filtered history. Stops at the first failure.
async fn fetch_refresh<S: RecordStore>(
    store: &S,
    history: &HistoryRequest,
) -> StoreResult<RefreshData> {
    let mut recent = store.list(&RecordFilter::default()).await?;
    recent.truncate(RECENT_LIMIT);
    let stats = store.stats().await?;
    let history = store.list(&history.filter).await?;
    Ok(RefreshData {
        recent,
        stats,
        history,
    })
}

/// Dashboard state machine over a [`RecordStore`]
pub struct DashboardController<S> {
    store: S,
    section: Section,
    form: SubmissionForm,
    filter: RecordFilter,
    recent: Vec<ConsumptionRecord>,
    history: Vec<ConsumptionRecord>,
    panel: Option<StatsPanel>,
    charts: Charts,
    message: Option<String>,
    today: Option<NaiveDate>,
    history_generation: u64,
}

impl<S: RecordStore> DashboardController<S> {
    pub fn new(store: S, capacities: Capacities) -> Self {
        Self {
            store,
            section: Section::default(),
            form: SubmissionForm::default(),
            filter: RecordFilter::default(),
            recent: Vec::new(),
            history: Vec::new(),
            panel: None,
            charts: Charts::new(capacities),
            message: None,
            today: None,
            history_generation: 0,
        }
    }

    /// Pin the projection start date instead of using the current UTC date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn show_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubmissionForm {
        &mut self.form
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn recent(&self) -> &[ConsumptionRecord] {
        &self.recent
    }

    pub fn history(&self) -> &[ConsumptionRecord] {
        &self.history
    }

    pub fn panel(&self) -> Option<&StatsPanel> {
        self.panel.as_ref()
    }

    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Take the pending user-visible message, clearing it
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    // ------------------------------------------------------------------
    // Refresh cycle
    // ------------------------------------------------------------------

    fn history_request(&self) -> HistoryRequest {
        HistoryRequest {
            filter: self.filter.clone(),
            generation: self.history_generation,
        }
    }

    /// Reload every panel: recent list, then stats, then filtered history.
    /// Stops at the first failure and then changes nothing but the message.
    pub async fn refresh(&mut self) -> DashboardResult<()> {
        let request = self.history_request();
        let result = fetch_refresh(&self.store, &request).await;
        self.finish_refresh(&request, result)
    }

    fn finish_refresh(
        &mut self,
        request: &HistoryRequest,
        result: StoreResult<RefreshData>,
    ) -> DashboardResult<()> {
        let data = match result {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(error = %err, "Dashboard refresh failed");
                self.message = Some(LOAD_FAILED_MESSAGE.to_string());
                return Err(err.into());
            }
        };

        let projection = project(&data.stats, self.today());
        self.charts.daily.update(&daily_series(&data.stats));
        self.charts.lines.update(&line_series(&data.stats));
        self.charts.inventory.update(&inventory_snapshot(&data.stats));
        self.charts.projection.update(&projection.series);

        if let Some(alert) = &projection.stock_alert {
            tracing::debug!(material = %alert.material, "Stock alert raised");
        }

        self.recent = data.recent;
        self.panel = Some(StatsPanel {
            stats: data.stats,
            projection,
        });
        if request.generation == self.history_generation {
            self.history = data.history;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Submit the current form.
    ///
    /// Invalid input is rejected before the store is contacted. A saved
    /// record clears the form and triggers a full refresh.
    pub async fn submit(&mut self) -> DashboardResult<ConsumptionRecord> {
        let record = self.begin_submit()?;
        let result = self.store.create(&record).await;
        let created = self.finish_submit(result)?;
        self.refresh().await?;
        Ok(created)
    }

    fn begin_submit(&mut self) -> DashboardResult<NewRecord> {
        self.form.to_new_record().map_err(|err| {
            self.message = Some(err.to_string());
            err.into()
        })
    }

    fn finish_submit(
        &mut self,
        result: StoreResult<ConsumptionRecord>,
    ) -> DashboardResult<ConsumptionRecord> {
        match result {
            Ok(created) => {
                tracing::info!(id = %created.id, line = %created.line, "Record saved");
                self.form = SubmissionForm::default();
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to save record");
                self.message = Some(SAVE_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    /// Delete a record after the confirmation hook agrees.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn delete<F>(&mut self, id: Uuid, confirm: F) -> DashboardResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }

        let result = self.store.delete(id).await;
        self.finish_delete(id, result)?;
        self.refresh().await?;
        Ok(true)
    }

    fn finish_delete(&mut self, id: Uuid, result: StoreResult<()>) -> DashboardResult<()> {
        result.map_err(|err| {
            tracing::warn!(error = %err, %id, "Failed to delete record");
            self.message = Some(DELETE_FAILED_MESSAGE.to_string());
            err.into()
        })
    }

    /// Replace the history filter and reload only the history view
    pub async fn set_filter(&mut self, filter: RecordFilter) -> DashboardResult<()> {
        let request = self.begin_filter(filter);
        let result = self.store.list(&request.filter).await;
        self.finish_history(&request, result)
    }

    pub async fn set_date_filter(&mut self, date: Option<NaiveDate>) -> DashboardResult<()> {
        let filter = RecordFilter {
            date,
            ..self.filter.clone()
        };
        self.set_filter(filter).await
    }

    pub async fn set_line_filter(&mut self, line: Option<ProductionLine>) -> DashboardResult<()> {
        let filter = RecordFilter {
            line,
            ..self.filter.clone()
        };
        self.set_filter(filter).await
    }

    pub async fn clear_date_filter(&mut self) -> DashboardResult<()> {
        self.set_date_filter(None).await
    }

    fn begin_filter(&mut self, filter: RecordFilter) -> HistoryRequest {
        self.filter = filter;
        self.history_generation += 1;
        self.history_request()
    }

    fn finish_history(
        &mut self,
        request: &HistoryRequest,
        result: StoreResult<Vec<ConsumptionRecord>>,
    ) -> DashboardResult<()> {
        match result {
            Ok(records) => {
                if request.generation == self.history_generation {
                    self.history = records;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "History reload failed");
                self.message = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    /// Notes of a visible record, or the placeholder text
    pub fn view_notes(&self, id: Uuid) -> &str {
        self.recent
            .iter()
            .chain(self.history.iter())
            .find(|record| record.id == id)
            .map(ConsumptionRecord::notes_or_default)
            .unwrap_or(NO_NOTES)
    }
}

/// Shared controller for callers that interleave actions.
///
/// The controller is borrowed only inside synchronous steps. Store requests
/// run on a clone of the store with no borrow held, so other callbacks can
/// read or update the dashboard while a request is in flight.
pub struct DashboardHandle<S> {
    inner: Rc<RefCell<DashboardController<S>>>,
}

impl<S> Clone for DashboardHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> DashboardHandle<S> {
    pub fn new(controller: DashboardController<S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(controller)),
        }
    }

    pub fn read<T>(&self, f: impl FnOnce(&DashboardController<S>) -> T) -> DashboardResult<T> {
        let controller = self.inner.try_borrow().map_err(|_| DashboardError::Busy)?;
        Ok(f(&controller))
    }

    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut DashboardController<S>) -> T,
    ) -> DashboardResult<T> {
        let mut controller = self
            .inner
            .try_borrow_mut()
            .map_err(|_| DashboardError::Busy)?;
        Ok(f(&mut controller))
    }
}

impl<S: RecordStore + Clone> DashboardHandle<S> {
    /// See [`DashboardController::refresh`]
    pub async fn refresh(&self) -> DashboardResult<()> {
        let (store, request) = self.read(|c| (c.store.clone(), c.history_request()))?;
        let result = fetch_refresh(&store, &request).await;
        self.update(|c| c.finish_refresh(&request, result))?
    }

    /// Replace the form with `form` and submit it
    pub async fn submit(&self, form: SubmissionForm) -> DashboardResult<ConsumptionRecord> {
        let (store, record) = self.update(|c| {
            c.form = form;
            let record = c.begin_submit()?;
            Ok::<_, DashboardError>((c.store.clone(), record))
        })??;

        let result = store.create(&record).await;
        let created = self.update(|c| c.finish_submit(result))??;
        self.refresh().await?;
        Ok(created)
    }

    /// See [`DashboardController::delete`]
    pub async fn delete<F>(&self, id: Uuid, confirm: F) -> DashboardResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }

        let store = self.read(|c| c.store.clone())?;
        let result = store.delete(id).await;
        self.update(|c| c.finish_delete(id, result))??;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn set_filter(&self, filter: RecordFilter) -> DashboardResult<()> {
        let (store, request) = self.update(|c| (c.store.clone(), c.begin_filter(filter)))?;
        let result = store.list(&request.filter).await;
        self.update(|c| c.finish_history(&request, result))?
    }

    pub async fn clear_date_filter(&self) -> DashboardResult<()> {
        let filter = self.read(|c| RecordFilter {
            date: None,
            ..c.filter.clone()
        })?;
        self.set_filter(filter).await
    }
}
