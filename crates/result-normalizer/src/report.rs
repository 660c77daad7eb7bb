use scenario_core::{DashboardError, DashboardResult, DisplayMetrics, RawReport};
use std::collections::BTreeMap;

/// Project each coin's backend report onto display metrics.
///
/// Pure renaming: nothing is recomputed, and an absent field is an error
/// rather than a zero.
pub fn aggregate(reports: &BTreeMap<String, RawReport>) -> DashboardResult<BTreeMap<String, DisplayMetrics>> {
    reports
        .iter()
        .map(|(coin, report)| Ok((coin.clone(), project(coin, report)?)))
        .collect()
}

fn project(coin: &str, report: &RawReport) -> DashboardResult<DisplayMetrics> {
    Ok(DisplayMetrics {
        buy_count: required(coin, "buy", report.buy)?,
        sell_count: required(coin, "sell", report.sell)?,
        avg_buy_price: required(coin, "buy_avg", report.buy_avg)?,
        avg_sell_price: required(coin, "sell_avg", report.sell_avg)?,
        buy_volume: required(coin, "buy_vol", report.buy_vol)?,
        sell_volume: required(coin, "sell_vol", report.sell_vol)?,
        fees: required(coin, "fees", report.fees)?,
        wallet_value: required(coin, "wallet", report.wallet)?,
        profit: required(coin, "profit", report.profit)?,
    })
}

fn required<T>(coin: &str, field: &str, value: Option<T>) -> DashboardResult<T> {
    value.ok_or_else(|| {
        DashboardError::malformed(format!("report for {} is missing '{}'", coin, field))
    })
}
