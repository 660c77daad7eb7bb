//! Raw response shapes as the backend sends them.
//!
//! Timestamps stay as strings here; resolving them to instants is the
//! normalizer's job so a bad value is reported with its location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{x, y}` pair with an unresolved timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignalPair {
    pub buy: Vec<RawPoint>,
    pub sell: Vec<RawPoint>,
}

/// The `trigger` field comes in two shapes: a single buy/sell pair, or one
/// pair per strategy/model identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTrigger {
    Flat(RawSignalPair),
    Keyed(BTreeMap<String, RawSignalPair>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub trades: i64,
    pub threshold: f64,
    pub value: f64,
    pub coins: f64,
    #[serde(rename = "coinValue", default, skip_serializing_if = "Option::is_none")]
    pub coin_value: Option<f64>,
    pub fees: f64,
    pub pnl: f64,
}

/// A `details` entry before validation; `result` may be missing on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRunDetail {
    pub coin: String,
    pub duration: i64,
    #[serde(default)]
    pub prev: Option<i64>,
    #[serde(default)]
    pub next: Option<i64>,
    #[serde(default)]
    pub result: Option<RunResult>,
}

/// Per-coin aggregate record. Every field is optional on the wire so the
/// aggregator can name exactly which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReport {
    #[serde(default)]
    pub buy: Option<u64>,
    #[serde(default)]
    pub buy_avg: Option<f64>,
    #[serde(default)]
    pub buy_vol: Option<f64>,
    #[serde(default)]
    pub sell: Option<u64>,
    #[serde(default)]
    pub sell_avg: Option<f64>,
    #[serde(default)]
    pub sell_vol: Option<f64>,
    #[serde(default)]
    pub wallet: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp: Option<String>,
}

/// Body of a successful `run` / `train` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResultPayload {
    pub time: Vec<String>,
    pub price: Vec<RawPoint>,
    pub trades: Vec<RawPoint>,
    pub trigger: RawTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<Vec<RawPoint>>,
    pub details: Vec<RawRunDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<BTreeMap<String, RawReport>>,
}

/// One entry of the `history` response: a stored range of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryRange {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub hash: Option<i64>,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
}
