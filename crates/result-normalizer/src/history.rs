use scenario_core::{parse_timestamp_at, DashboardError, DashboardResult, HistoryRange, HistorySeries, Point};
use serde_json::Value;

/// Marker height for a stored range; the chart only shows where data exists.
const AVAILABLE: f64 = 1.0;

/// `history` response → one availability marker per stored range, at its start.
///
/// `coin` is the one the request asked for; history records do not carry it.
pub fn normalize_history(coin: &str, value: Value) -> DashboardResult<HistorySeries> {
    let ranges: Vec<HistoryRange> = serde_json::from_value(value)
        .map_err(|e| DashboardError::malformed(format!("history payload: {}", e)))?;

    let points = ranges
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let instant = parse_timestamp_at(&range.from, || format!("history[{}].From", i))?;
            Ok(Point::new(instant, AVAILABLE))
        })
        .collect::<DashboardResult<Vec<Point>>>()?;

    tracing::debug!("{} stored ranges for {}", points.len(), coin);
    Ok(HistorySeries {
        coin: coin.to_string(),
        points,
    })
}
