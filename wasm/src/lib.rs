//! WebAssembly module for the Material Consumption Tracker dashboard
//!
//! Provides the browser side of the tracker:
//! - Dashboard controller driving the record API
//! - Chart state for the four dashboard charts
//! - Client-side validation and reorder projection

use chrono::NaiveDate;
use js_sys::{Function, Promise};
use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod charts;
pub mod controller;
pub mod store;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use charts::{Chart, ChartData};
use controller::{DashboardController, DashboardHandle, Section, StatsPanel};
use store::HttpRecordStore;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("Consumption tracker module loaded"));
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    let value = JsValue::from_str(&message.to_string());
    web_sys::console::error_1(&value);
    value
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", value, e))
}

fn parse_optional<T, F>(value: Option<String>, parse: F) -> Result<Option<T>, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse(v).map(Some),
    }
}

fn filter_from_parts(date: Option<String>, line: Option<String>) -> Result<RecordFilter, String> {
    Ok(RecordFilter {
        date: parse_optional(date, parse_day)?,
        line: parse_optional(line, |v| v.parse::<ProductionLine>().map_err(|e| e.to_string()))?,
    })
}

fn projection_json(stats_json: &str, today: &str) -> Result<String, String> {
    let stats: StatsSnapshot =
        serde_json::from_str(stats_json).map_err(|e| format!("Invalid stats JSON: {}", e))?;
    let projection = project(&stats, parse_day(today)?);
    serde_json::to_string(&projection).map_err(|e| e.to_string())
}

fn stock_alert_text(stats_json: &str) -> Result<Option<String>, String> {
    let stats: StatsSnapshot =
        serde_json::from_str(stats_json).map_err(|e| format!("Invalid stats JSON: {}", e))?;
    Ok(stock_alert(&stats.inventory).map(|alert| alert.message))
}

fn submission_json(form_json: &str) -> Result<String, String> {
    let form: SubmissionForm =
        serde_json::from_str(form_json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    let record = form.to_new_record().map_err(|e| e.to_string())?;
    serde_json::to_string(&record).map_err(|e| e.to_string())
}

/// Forecast for a stats snapshot, as JSON
#[wasm_bindgen]
pub fn compute_projection(stats_json: &str, today: &str) -> Result<String, JsValue> {
    projection_json(stats_json, today).map_err(js_error)
}

/// Banner text for the stock alert, if one applies
#[wasm_bindgen]
pub fn stock_alert_message(stats_json: &str) -> Result<Option<String>, JsValue> {
    stock_alert_text(stats_json).map_err(js_error)
}

/// Validate raw form values and return the record payload as JSON
#[wasm_bindgen]
pub fn validate_submission(form_json: &str) -> Result<String, JsValue> {
    submission_json(form_json).map_err(js_error)
}

/// Remaining-days text, capped for display
#[wasm_bindgen]
pub fn format_depletion_days(days: i64) -> String {
    display_days(days)
}

/// Everything the page renders, in one JSON document
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardView<'a> {
    section: Section,
    filter: &'a RecordFilter,
    recent: &'a [ConsumptionRecord],
    history: &'a [ConsumptionRecord],
    panel: Option<&'a StatsPanel>,
    charts: ChartsView<'a>,
    message: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartsView<'a> {
    daily: &'a ChartData,
    lines: &'a ChartData,
    inventory: &'a ChartData,
    projection: &'a ChartData,
}

type Handle = DashboardHandle<HttpRecordStore>;

/// Dashboard handle exported to JavaScript
#[wasm_bindgen]
pub struct DashboardApp {
    handle: Handle,
}

impl DashboardApp {
    /// Run `action` with its own handle to the dashboard as a JS promise
    fn spawn<F, Fut>(&self, action: F) -> Promise
    where
        F: FnOnce(Handle) -> Fut,
        Fut: std::future::Future<Output = Result<JsValue, JsValue>> + 'static,
    {
        future_to_promise(action(self.handle.clone()))
    }
}

#[wasm_bindgen]
impl DashboardApp {
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: String, rippon_capacity: u32, labels_capacity: u32) -> DashboardApp {
        let capacities = Capacities {
            rippon: i64::from(rippon_capacity),
            labels: i64::from(labels_capacity),
        };
        DashboardApp {
            handle: DashboardHandle::new(DashboardController::new(
                HttpRecordStore::new(base_url),
                capacities,
            )),
        }
    }

    /// Load every panel
    pub fn load(&self) -> Promise {
        self.spawn(|handle| async move {
            handle.refresh().await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Submit the entry form given as JSON
    pub fn submit(&self, form_json: String) -> Promise {
        self.spawn(|handle| async move {
            let form: SubmissionForm = serde_json::from_str(&form_json)
                .map_err(|e| js_error(format!("Invalid form JSON: {}", e)))?;
            let created = handle.submit(form).await.map_err(js_error)?;
            Ok(JsValue::from_str(&created.id.to_string()))
        })
    }

    /// Delete a record; `confirm` is called with the prompt text
    pub fn delete_record(&self, id: String, confirm: Function) -> Promise {
        self.spawn(|handle| async move {
            let id = Uuid::parse_str(&id).map_err(js_error)?;
            let deleted = handle
                .delete(id, |prompt| {
                    confirm
                        .call1(&JsValue::NULL, &JsValue::from_str(prompt))
                        .ok()
                        .and_then(|answer| answer.as_bool())
                        .unwrap_or(false)
                })
                .await
                .map_err(js_error)?;
            Ok(JsValue::from_bool(deleted))
        })
    }

    /// Set both history filters. Empty strings clear a filter.
    pub fn set_filter(&self, date: Option<String>, line: Option<String>) -> Promise {
        self.spawn(|handle| async move {
            let filter = filter_from_parts(date, line).map_err(js_error)?;
            handle.set_filter(filter).await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn clear_date_filter(&self) -> Promise {
        self.spawn(|handle| async move {
            handle.clear_date_filter().await.map_err(js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn show_section(&self, section: &str) -> Result<(), JsValue> {
        let section: Section = section.parse().map_err(js_error)?;
        self.handle
            .update(|controller| controller.show_section(section))
            .map_err(js_error)
    }

    pub fn view_notes(&self, id: &str) -> Result<String, JsValue> {
        let id = Uuid::parse_str(id).map_err(js_error)?;
        self.handle
            .read(|controller| controller.view_notes(id).to_string())
            .map_err(js_error)
    }

    pub fn take_message(&self) -> Result<Option<String>, JsValue> {
        self.handle
            .update(|controller| controller.take_message())
            .map_err(js_error)
    }

    /// Current view state as JSON
    pub fn state(&self) -> Result<String, JsValue> {
        self.handle
            .read(|controller| {
                let charts = controller.charts();
                let view = DashboardView {
                    section: controller.section(),
                    filter: controller.filter(),
                    recent: controller.recent(),
                    history: controller.history(),
                    panel: controller.panel(),
                    charts: ChartsView {
                        daily: charts.daily.data(),
                        lines: charts.lines.data(),
                        inventory: charts.inventory.data(),
                        projection: charts.projection.data(),
                    },
                    message: controller.message(),
                };
                serde_json::to_string(&view)
            })
            .map_err(js_error)?
            .map_err(js_error)
    }
}
