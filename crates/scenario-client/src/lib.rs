pub mod builder;
pub mod catalog;
pub mod client;

pub use builder::{RangeConfig, RiskConfig, RunConfig, ScenarioRequest, ScenarioRequestBuilder, TrainConfig};
pub use catalog::{parse_model_id, ModelCatalog};
pub use client::RequestClient;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:6090/test";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Where the backtest service lives and how long a single request may take.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("BACKTEST_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_millis(
                std::env::var("BACKTEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Load from environment variables (`BACKTEST_BASE_URL`, `BACKTEST_TIMEOUT_MS`).
    pub fn from_env() -> Self {
        Self::default()
    }
}
