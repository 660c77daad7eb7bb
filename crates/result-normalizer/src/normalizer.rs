//! `run` / `train` payload → [`VisualizationModel`].
//!
//! Every timestamp must resolve; the first one that does not aborts the whole
//! conversion with `MalformedPayload`. Array order is kept as received, the
//! backend already emits chronological series.

use chrono::{DateTime, Utc};
use scenario_core::{
    parse_timestamp_at, DashboardError, DashboardResult, Point, RawPoint, RawResultPayload,
    RawRunDetail, RawSignalPair, RawTrigger, RunDetail, SignalSeries, VisualizationModel,
    DEFAULT_SIGNAL_KEY, UNKNOWN_COIN,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse a JSON body and normalize it.
pub fn normalize_value(value: Value) -> DashboardResult<VisualizationModel> {
    let raw: RawResultPayload = serde_json::from_value(value)
        .map_err(|e| DashboardError::malformed(format!("result payload: {}", e)))?;
    normalize(&raw)
}

pub fn normalize(raw: &RawResultPayload) -> DashboardResult<VisualizationModel> {
    let time_axis = raw
        .time
        .iter()
        .enumerate()
        .map(|(i, ts)| parse_timestamp_at(ts, || format!("time[{}]", i)))
        .collect::<DashboardResult<Vec<DateTime<Utc>>>>()?;

    let price_series = resolve_points(&raw.price, "price")?;
    let trade_series = resolve_points(&raw.trades, "trades")?;
    let signal_series = resolve_trigger(&raw.trigger)?;
    let loss_series = raw
        .loss
        .as_deref()
        .map(|loss| resolve_points(loss, "loss"))
        .transpose()?;

    let run_details = raw
        .details
        .iter()
        .enumerate()
        .map(|(i, detail)| resolve_detail(i, detail))
        .collect::<DashboardResult<Vec<RunDetail>>>()?;

    let coin = infer_coin(&run_details);
    if !run_details.is_empty() || (price_series.is_empty() && signal_series.is_empty()) {
        tracing::debug!(
            "Normalized {} result: {} prices, {} trades, {} signal sets",
            coin,
            price_series.len(),
            trade_series.len(),
            signal_series.len()
        );
    } else {
        tracing::warn!(
            "Result has {} prices and {} signal sets but no run details; coin reported as '{}'",
            price_series.len(),
            signal_series.len(),
            UNKNOWN_COIN
        );
    }

    Ok(VisualizationModel {
        coin,
        time_axis,
        price_series,
        trade_series,
        signal_series,
        loss_series,
        run_details,
        reports: raw.report.clone().unwrap_or_default(),
    })
}

/// The active coin comes from the first run detail and nowhere else.
fn infer_coin(details: &[RunDetail]) -> String {
    details
        .first()
        .map(|d| d.coin.clone())
        .unwrap_or_else(|| UNKNOWN_COIN.to_string())
}

fn resolve_points(points: &[RawPoint], field: &str) -> DashboardResult<Vec<Point>> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let instant = parse_timestamp_at(&p.x, || format!("{}[{}].x", field, i))?;
            Ok(Point::new(instant, p.y))
        })
        .collect()
}

fn resolve_pair(pair: &RawSignalPair, field: &str) -> DashboardResult<SignalSeries> {
    Ok(SignalSeries {
        buy: resolve_points(&pair.buy, &format!("{}.buy", field))?,
        sell: resolve_points(&pair.sell, &format!("{}.sell", field))?,
    })
}

fn resolve_trigger(trigger: &RawTrigger) -> DashboardResult<BTreeMap<String, SignalSeries>> {
    let mut series = BTreeMap::new();
    match trigger {
        RawTrigger::Flat(pair) => {
            series.insert(DEFAULT_SIGNAL_KEY.to_string(), resolve_pair(pair, "trigger")?);
        }
        RawTrigger::Keyed(pairs) => {
            for (key, pair) in pairs {
                let resolved = resolve_pair(pair, &format!("trigger.{}", key))?;
                series.insert(key.clone(), resolved);
            }
        }
    }
    Ok(series)
}

fn resolve_detail(index: usize, detail: &RawRunDetail) -> DashboardResult<RunDetail> {
    let result = detail.result.clone().ok_or_else(|| {
        DashboardError::malformed(format!(
            "details[{}] ({}) has no result block",
            index, detail.coin
        ))
    })?;
    Ok(RunDetail {
        coin: detail.coin.clone(),
        duration: detail.duration,
        prev: detail.prev,
        next: detail.next,
        result,
    })
}
