use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::payload::{RawReport, RunResult};

/// Coin shown when a response carries no run details to infer it from.
pub const UNKNOWN_COIN: &str = "unknown";

/// Signal key used when the backend sends a single, unkeyed buy/sell pair.
pub const DEFAULT_SIGNAL_KEY: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub instant: DateTime<Utc>,
    pub value: f64,
}

impl Point {
    pub fn new(instant: DateTime<Utc>, value: f64) -> Self {
        Self { instant, value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub buy: Vec<Point>,
    pub sell: Vec<Point>,
}

/// A validated `details` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    pub coin: String,
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<i64>,
    pub result: RunResult,
}

/// Canonical, chart-ready form of a `run`/`train` response.
///
/// Built once per successful response and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationModel {
    pub coin: String,
    pub time_axis: Vec<DateTime<Utc>>,
    pub price_series: Vec<Point>,
    pub trade_series: Vec<Point>,
    pub signal_series: BTreeMap<String, SignalSeries>,
    /// `None` when the backend sent no training curve at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_series: Option<Vec<Point>>,
    pub run_details: Vec<RunDetail>,
    pub reports: BTreeMap<String, RawReport>,
}

impl VisualizationModel {
    pub fn has_known_coin(&self) -> bool {
        self.coin != UNKNOWN_COIN
    }

    pub fn signal_keys(&self) -> Vec<&str> {
        self.signal_series.keys().map(String::as_str).collect()
    }
}

/// Display-ready per-coin metrics, field-for-field from the backend report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub buy_count: u64,
    pub sell_count: u64,
    pub avg_buy_price: f64,
    pub avg_sell_price: f64,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub fees: f64,
    pub wallet_value: f64,
    pub profit: f64,
}

/// Data-availability markers from the `history` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub coin: String,
    pub points: Vec<Point>,
}

/// A trained model offered by the `models` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub title: String,
    pub coin: String,
    pub duration: String,
    pub accuracy: Option<f64>,
}
