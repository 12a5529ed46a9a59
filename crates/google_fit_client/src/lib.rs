//! Minimal `GoogleFitClient` trait and the dataset types it returns.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub mod auth;
pub mod config;
pub mod http_client;
pub mod retry;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("api error {status}: {body_snippet}")]
    Api { status: u16, body_snippet: String },
}

/// One value slot inside a data point. Google Fit populates exactly one of
/// `intVal` / `fpVal` per slot; a slot with neither carries no measurement.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DataValue {
    #[serde(rename = "intVal")]
    pub int_val: Option<i64>,
    #[serde(rename = "fpVal")]
    pub fp_val: Option<f64>,
}

impl DataValue {
    /// The present value as a float, integer variant preferred.
    pub fn as_f64(&self) -> Option<f64> {
        self.int_val.map(|v| v as f64).or(self.fp_val)
    }
}

/// One sample from a provider dataset. Interval-style points (sleep segments)
/// always carry both instants; instantaneous points may omit them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[serde(default, deserialize_with = "deserialize_opt_nanos")]
    pub start_time_nanos: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_nanos")]
    pub end_time_nanos: Option<i64>,
    #[serde(default)]
    pub value: Vec<DataValue>,
}

/// A day's worth of points for one data source. An absent `point` array
/// deserializes to an empty dataset.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub point: Vec<DataPoint>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}

/// Half-open `[start, end)` range of one calendar day, in epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DayWindow {
    /// Dataset range key in the provider's nanosecond format.
    pub fn dataset_id(&self) -> String {
        format!("{}000000-{}000000", self.start_ms, self.end_ms)
    }
}

// Google Fit serializes int64 timestamps as decimal strings; accept both
// string and number forms.
fn deserialize_opt_nanos<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_i64()),
        Some(serde_json::Value::String(s)) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid nanos timestamp: {s}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait GoogleFitClient: Send + Sync + 'static {
    /// Fetch the points recorded for `data_source_id` inside `window`.
    ///
    /// An empty dataset is a successful response; implementors map transport
    /// and provider failures to `FitError`.
    async fn dataset(&self, data_source_id: &str, window: &DayWindow)
    -> Result<Dataset, FitError>;
}
