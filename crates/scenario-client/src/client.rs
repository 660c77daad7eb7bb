use reqwest::header;
use scenario_core::{DashboardError, DashboardResult, Operation, ScenarioParameters};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::ClientConfig;

/// Single-shot GET client for the backtest service.
///
/// Holds no per-request state, so clones can issue independent calls
/// concurrently.
#[derive(Clone)]
pub struct RequestClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RequestClient {
    pub fn new(config: &ClientConfig) -> DashboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DashboardError::NetworkFailure(format!("could not create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `endpoint` with `params` as its query string.
    pub fn url(&self, endpoint: &str, params: &ScenarioParameters) -> String {
        let query = params.to_query_string();
        if query.is_empty() {
            format!("{}/{}", self.base_url, endpoint)
        } else {
            format!("{}/{}?{}", self.base_url, endpoint, query)
        }
    }

    /// Issue one GET and parse the body as JSON.
    ///
    /// No retries: a transport failure is a `NetworkFailure`, a non-success
    /// status a `BackendFailure` carrying the body text, and a success body
    /// that is not JSON a `MalformedPayload`.
    pub async fn call(&self, endpoint: &str, params: &ScenarioParameters) -> DashboardResult<Value> {
        let response = self.send(endpoint, params, "application/json").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            DashboardError::malformed(format!("{} response is not JSON: {}", endpoint, e))
        })
    }

    /// Like [`call`](Self::call), but the success body is returned as text.
    pub async fn call_text(&self, endpoint: &str, params: &ScenarioParameters) -> DashboardResult<String> {
        let response = self.send(endpoint, params, "text/plain").await?;
        response
            .text()
            .await
            .map_err(|e| self.transport_error(endpoint, e))
    }

    /// [`call`](Self::call), then deserialize into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &ScenarioParameters,
    ) -> DashboardResult<T> {
        let value = self.call(endpoint, params).await?;
        serde_json::from_value(value).map_err(|e| {
            DashboardError::malformed(format!("unexpected {} response shape: {}", endpoint, e))
        })
    }

    pub async fn request(&self, operation: Operation, params: &ScenarioParameters) -> DashboardResult<Value> {
        self.call(operation.endpoint(), params).await
    }

    async fn send(
        &self,
        endpoint: &str,
        params: &ScenarioParameters,
        accept: &str,
    ) -> DashboardResult<reqwest::Response> {
        let url = self.url(endpoint, params);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, accept)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        tracing::warn!("Backend rejected {} with {}: {}", endpoint, status, body);
        Err(DashboardError::BackendFailure {
            status: status.as_u16(),
            body,
        })
    }

    fn transport_error(&self, endpoint: &str, e: reqwest::Error) -> DashboardError {
        let description = if e.is_timeout() {
            format!("{} request timed out after {}ms", endpoint, self.timeout.as_millis())
        } else if e.is_connect() {
            format!("could not reach backend at {}: {}", self.base_url, e)
        } else {
            format!("{} request failed: {}", endpoint, e)
        };
        tracing::warn!("{}", description);
        DashboardError::NetworkFailure(description)
    }
}
