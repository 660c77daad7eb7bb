use crate::*;
use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::NaiveDate;
use scenario_client::{ClientConfig, RangeConfig, RequestClient, RunConfig, ScenarioRequest, TrainConfig};
use scenario_core::DashboardError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

fn chart_payload(coin: &str) -> Value {
    let mut payload = json!({
        "time": ["2024-01-01T00:00:00Z", "2024-01-01T00:15:00Z"],
        "price": [
            {"x": "2024-01-01T00:00:00Z", "y": 42000.0},
            {"x": "2024-01-01T00:15:00Z", "y": 42150.5}
        ],
        "trades": [{"x": "2024-01-01T00:15:00Z", "y": 42150.5}],
        "trigger": {
            "buy": [{"x": "2024-01-01T00:00:00Z", "y": 1.0}],
            "sell": []
        },
        "details": [{
            "coin": coin,
            "duration": 15,
            "prev": 3,
            "next": 1,
            "result": {
                "trades": 1, "threshold": 0.0, "value": 1002.5, "coins": 0.0,
                "fees": 0.75, "pnl": 2.5
            }
        }],
        "report": {}
    });
    payload["report"][coin] = json!({
        "buy": 1, "buy_avg": 42000.0, "buy_vol": 0.02,
        "sell": 1, "sell_avg": 42150.5, "sell_vol": 0.02,
        "wallet": 1002.5, "profit": 2.5, "fees": 0.75,
        "last_price": 42150.5, "stamp": "2024-01-01T00:15:00Z"
    });
    payload
}

async fn run_handler(Query(query): Query<HashMap<String, String>>) -> axum::response::Response {
    let coin = query.get("coin").cloned().unwrap_or_default();
    match coin.as_str() {
        "FAIL" => (StatusCode::BAD_REQUEST, "bad date range").into_response(),
        "BLANK" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "BROKEN" => {
            let mut payload = chart_payload("BROKEN");
            payload["report"]["BROKEN"]
                .as_object_mut()
                .unwrap()
                .remove("profit");
            Json(payload).into_response()
        }
        "SLOW" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(chart_payload("SLOW")).into_response()
        }
        _ => Json(chart_payload(&coin)).into_response(),
    }
}

const LOAD_SUMMARY: &str =
    "2024-01-01 00:00:00 +0000 UTC - 2024-01-02 00:00:00 +0000 UTC | 1234";

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/test/run", get(run_handler))
        .route("/test/train", get(run_handler))
        .route(
            "/test/history",
            get(|| async {
                Json(json!([
                    {"Path": "BTC_8h_1", "Hash": 1, "From": "2024-01-01T00:00:00Z", "To": "2024-01-01T08:00:00Z"},
                    {"Path": "BTC_8h_2", "Hash": 2, "From": "2024-01-01T08:00:00Z", "To": "2024-01-01T16:00:00Z"}
                ]))
            }),
        )
        .route(
            "/test/models",
            get(|| async { Json(json!(["ETH_5_2_0.55", "BTC_15_3_0.71", "BTC_60_1_x"])) }),
        )
        .route("/test/load", get(|| async { LOAD_SUMMARY }));
    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/test", addr)
}

/// A base URL nothing listens on.
async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/test", addr)
}

fn dashboard(base_url: &str) -> (Dashboard, MemoryChannel) {
    let channel = MemoryChannel::new();
    let config = ClientConfig::new(base_url, Duration::from_secs(2));
    let dashboard = Dashboard::new(&config, ErrorRouter::new(channel.clone())).unwrap();
    (dashboard, channel)
}

fn run_config(coin: &str) -> RunConfig {
    RunConfig {
        range: RangeConfig::new(
            coin,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ),
        ..RunConfig::default()
    }
}

#[tokio::test]
async fn test_run_scenario_produces_chart_and_metrics() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    assert_eq!(dash.run_scenario(run_config("BTC")).await, Completion::Applied);

    let snapshot = dash.snapshot().unwrap();
    assert_eq!(snapshot.model.coin, "BTC");
    assert_eq!(snapshot.model.price_series.len(), 2);
    assert_eq!(snapshot.model.signal_keys(), vec!["default"]);
    let metrics = &snapshot.metrics["BTC"];
    assert_eq!(metrics.buy_count, 1);
    assert_eq!(metrics.profit, 2.5);
    assert_eq!(metrics.wallet_value, 1002.5);
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_routed_and_view_kept() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    dash.run_scenario(run_config("BTC")).await;
    let before = dash.snapshot().unwrap();

    let completion = dash.run_scenario(run_config("FAIL")).await;
    assert_eq!(
        completion,
        Completion::Failed(DashboardError::BackendFailure {
            status: 400,
            body: "bad date range".to_string(),
        })
    );

    let alert = channel.latest().unwrap();
    assert_eq!(alert.kind, AlertKind::Backend);
    assert_eq!(alert.message, "bad date range");
    assert_eq!(dash.snapshot().unwrap(), before);
}

#[tokio::test]
async fn test_blank_backend_body_uses_status() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    assert!(dash.execute(ScenarioRequest::Run(run_config("BLANK"))).await.is_none());
    assert_eq!(channel.latest().unwrap().message, "backend returned status 500");
}

#[tokio::test]
async fn test_missing_report_field_is_reported() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    let completion = dash.run_scenario(run_config("BROKEN")).await;
    assert!(matches!(completion, Completion::Failed(DashboardError::MalformedPayload(_))));
    assert!(dash.snapshot().is_none());

    let alert = channel.latest().unwrap();
    assert_eq!(alert.kind, AlertKind::Client);
    assert!(alert.message.contains("profit"), "{}", alert.message);
}

#[tokio::test]
async fn test_superseded_chart_response_is_dropped() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);
    let fetcher = dash.fetcher();

    let older = dash.begin_chart();
    let slow = tokio::spawn({
        let fetcher = fetcher.clone();
        async move { fetcher.chart(&ScenarioRequest::Run(run_config("SLOW"))).await }
    });

    let newer = dash.begin_chart();
    let fast = fetcher.chart(&ScenarioRequest::Run(run_config("ETH"))).await;
    assert_eq!(dash.complete_chart(newer, fast).await, Completion::Applied);

    let late = slow.await.unwrap();
    assert!(late.is_ok());
    assert_eq!(dash.complete_chart(older, late).await, Completion::Stale);

    assert_eq!(dash.snapshot().unwrap().model.coin, "ETH");
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_stale_failure_is_not_routed() {
    let (mut dash, channel) = dashboard(&dead_backend().await);

    let older = dash.begin_chart();
    let _newer = dash.begin_chart();
    let outcome = dash
        .fetcher()
        .chart(&ScenarioRequest::Run(run_config("BTC")))
        .await;
    assert!(matches!(outcome, Err(DashboardError::NetworkFailure(_))));

    assert_eq!(dash.complete_chart(older, outcome).await, Completion::Stale);
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_client_error() {
    let (mut dash, channel) = dashboard(&dead_backend().await);

    assert!(dash.execute(ScenarioRequest::Run(run_config("BTC"))).await.is_none());

    let alert = channel.latest().unwrap();
    assert_eq!(alert.kind, AlertKind::Client);
    assert!(alert.message.starts_with("Network failure"), "{}", alert.message);
}

#[tokio::test]
async fn test_invalid_config_never_reaches_backend() {
    let (mut dash, channel) = dashboard(&dead_backend().await);

    let config = RunConfig {
        interval: 7,
        ..run_config("BTC")
    };
    let completion = dash.run_scenario(config).await;
    assert!(matches!(completion, Completion::Failed(DashboardError::InvalidConfig(_))));
    assert!(channel
        .latest()
        .unwrap()
        .message
        .starts_with("Invalid configuration"));
}

#[tokio::test]
async fn test_train_uses_chart_view() {
    let base = spawn_backend().await;
    let (mut dash, _channel) = dashboard(&base);

    let config = TrainConfig {
        range: run_config("ETH").range,
        models: vec!["ETH_5_2_0.55".to_string()],
        ..TrainConfig::default()
    };
    match dash.execute(ScenarioRequest::Train(config)).await {
        Some(View::Chart(snapshot)) => assert_eq!(snapshot.model.coin, "ETH"),
        other => panic!("expected chart view, got {:?}", other),
    }
}

#[tokio::test]
async fn test_history_models_and_load() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    match dash.execute(ScenarioRequest::History(run_config("BTC").range)).await {
        Some(View::History(series)) => {
            assert_eq!(series.coin, "BTC");
            assert_eq!(series.points.len(), 2);
        }
        other => panic!("expected history view, got {:?}", other),
    }
    assert_eq!(dash.history_series().unwrap().points.len(), 2);

    match dash.execute(ScenarioRequest::Models).await {
        Some(View::Models(models)) => {
            let titles: Vec<&str> = models.iter().map(|m| m.title.as_str()).collect();
            assert_eq!(titles, vec!["BTC_15_3_0.71", "ETH_5_2_0.55", "BTC_60_1_x"]);
        }
        other => panic!("expected models view, got {:?}", other),
    }
    assert_eq!(dash.catalog().unwrap().for_coin("BTC").len(), 2);

    match dash.execute(ScenarioRequest::Load(run_config("BTC").range)).await {
        Some(View::Loaded(body)) => assert_eq!(body, LOAD_SUMMARY),
        other => panic!("expected load view, got {:?}", other),
    }
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_plain_text_load_is_not_an_error() {
    let base = spawn_backend().await;
    let (mut dash, channel) = dashboard(&base);

    assert_eq!(
        dash.load_range(run_config("BTC").range).await.as_deref(),
        Some(LOAD_SUMMARY)
    );
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_empty_model_directory_gives_empty_catalog() {
    let app = Router::new().route("/test/models", get(|| async { Json(Value::Null) }));
    let (mut dash, channel) = dashboard(&serve(app).await);

    match dash.execute(ScenarioRequest::Models).await {
        Some(View::Models(models)) => assert!(models.is_empty()),
        other => panic!("expected empty models view, got {:?}", other),
    }
    assert!(dash.catalog().unwrap().is_empty());
    assert!(channel.alerts().is_empty());
}

#[tokio::test]
async fn test_reset_clears_views() {
    let base = spawn_backend().await;
    let (mut dash, _channel) = dashboard(&base);

    dash.run_scenario(run_config("BTC")).await;
    dash.list_models().await;
    assert!(dash.snapshot().is_some());

    dash.reset();
    assert!(dash.snapshot().is_none());
    assert!(dash.catalog().is_none());
}

#[test]
fn test_view_serializes_with_tag() {
    let view = View::Loaded("BTC | 12".to_string());
    let value = serde_json::to_value(&view).unwrap();
    assert_eq!(value, json!({"view": "loaded", "data": "BTC | 12"}));
}

#[test]
fn test_client_builds_without_network() {
    let client = RequestClient::new(&ClientConfig::new("http://localhost:6090/test", Duration::from_secs(1)));
    assert!(client.is_ok());
}
