//! Record store boundary used by the dashboard
//!
//! The dashboard only talks to the backend through [`RecordStore`]. The
//! browser build uses [`HttpRecordStore`]; tests substitute an in-memory store.

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use shared::{ConsumptionRecord, NewRecord, RecordFilter, StatsSnapshot};
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a record store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Record rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the dashboard needs.
///
/// Futures are not required to be `Send`; the browser fetch backend is
/// single-threaded.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn create(&self, record: &NewRecord) -> StoreResult<ConsumptionRecord>;

    /// Records matching `filter`, newest first
    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<ConsumptionRecord>>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn stats(&self) -> StoreResult<StatsSnapshot>;
}

/// Error body returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// [`RecordStore`] backed by the tracker HTTP API
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a success body, or map the failure with [`status_error`]
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        missing: Option<Uuid>,
    ) -> StoreResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await?;
        Err(status_error(status, &body, missing))
    }
}

/// Map a failed response to a [`StoreError`].
///
/// `missing` is the record a 404 refers to, when the request named one.
/// Other 4xx answers are rejections and everything else is an outage. The
/// message comes from the backend error body when it has one.
fn status_error(status: StatusCode, body: &str, missing: Option<Uuid>) -> StoreError {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = missing {
            return StoreError::NotFound(id);
        }
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| status.to_string());
    if status.is_client_error() {
        StoreError::Rejected(message)
    } else {
        StoreError::Unavailable(message)
    }
}

impl RecordStore for HttpRecordStore {
    async fn create(&self, record: &NewRecord) -> StoreResult<ConsumptionRecord> {
        let response = self
            .client
            .post(self.url("/api/records"))
            .json(record)
            .send()
            .await?;

        Self::read_json(response, None).await
    }

    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<ConsumptionRecord>> {
        let response = self
            .client
            .get(self.url("/api/records"))
            .query(&filter.query_pairs())
            .send()
            .await?;

        Self::read_json(response, None).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/records/{}", id)))
            .send()
            .await?;

        Self::read_json::<serde_json::Value>(response, Some(id))
            .await
            .map(|_| ())
    }

    async fn stats(&self) -> StoreResult<StatsSnapshot> {
        let response = self.client.get(self.url("/api/stats")).send().await?;
        Self::read_json(response, None).await
    }
}
