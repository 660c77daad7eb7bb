use result_normalizer::{aggregate, normalize_history, normalize_value};
use scenario_client::{
    ClientConfig, ModelCatalog, RangeConfig, RequestClient, RunConfig, ScenarioRequest,
    ScenarioRequestBuilder, TrainConfig,
};
use scenario_core::{
    DashboardResult, DisplayMetrics, HistorySeries, ModelDescriptor, Operation, VisualizationModel,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::router::ErrorRouter;
use crate::session::{Completion, Generation, Session};

/// Everything the chart view renders for one run/train result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub model: VisualizationModel,
    pub metrics: BTreeMap<String, DisplayMetrics>,
}

/// What a finished request hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum View {
    Chart(DashboardSnapshot),
    History(HistorySeries),
    Models(Vec<ModelDescriptor>),
    Loaded(String),
}

/// Stateless request side: build parameters, call, normalize.
///
/// Cheap to clone; an event loop can move one into a spawned task and feed
/// the outcome back through [`Dashboard::complete_chart`].
#[derive(Clone)]
pub struct Fetcher {
    client: RequestClient,
}

impl Fetcher {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// `run` or `train` → normalized model plus per-coin metrics.
    pub async fn chart(&self, request: &ScenarioRequest) -> DashboardResult<DashboardSnapshot> {
        let params = ScenarioRequestBuilder::build(request)?;
        let body = self.client.request(request.operation(), &params).await?;
        let model = normalize_value(body)?;
        let metrics = aggregate(&model.reports)?;
        Ok(DashboardSnapshot { model, metrics })
    }

    pub async fn history(&self, range: &RangeConfig) -> DashboardResult<HistorySeries> {
        let params = ScenarioRequestBuilder::history(range)?;
        let body = self.client.request(Operation::History, &params).await?;
        normalize_history(range.coin.trim(), body)
    }

    /// An empty model directory comes back as `null`.
    pub async fn models(&self) -> DashboardResult<ModelCatalog> {
        let ids: Option<Vec<String>> = self
            .client
            .call_as(Operation::Models.endpoint(), &ScenarioRequestBuilder::models())
            .await?;
        Ok(ModelCatalog::from_ids(ids.unwrap_or_default()))
    }

    /// Ask the backend to pull a range of trades; the reply is a plain-text
    /// summary and is passed on as is.
    pub async fn load(&self, range: &RangeConfig) -> DashboardResult<String> {
        let params = ScenarioRequestBuilder::load(range)?;
        let body = self
            .client
            .call_text(Operation::Load.endpoint(), &params)
            .await?;
        tracing::info!("Load of {} accepted: {}", range.coin, body.trim());
        Ok(body)
    }
}

/// The dashboard core: owns the views and the single error exit.
///
/// The `run_scenario` / `train_model` / `load_history` shortcuts borrow the
/// dashboard for the whole request, so they run one request at a time. To
/// overlap requests, take a [`Fetcher`], call `begin_chart` or
/// `begin_history` before each request and hand every outcome to
/// `complete_chart` / `complete_history`; only the latest is applied.
pub struct Dashboard {
    fetcher: Fetcher,
    router: ErrorRouter,
    chart: Session<DashboardSnapshot>,
    history: Session<HistorySeries>,
    catalog: Option<ModelCatalog>,
}

impl Dashboard {
    pub fn new(config: &ClientConfig, router: ErrorRouter) -> DashboardResult<Self> {
        Ok(Self::with_client(RequestClient::new(config)?, router))
    }

    pub fn with_client(client: RequestClient, router: ErrorRouter) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            router,
            chart: Session::new(),
            history: Session::new(),
            catalog: None,
        }
    }

    pub fn fetcher(&self) -> Fetcher {
        self.fetcher.clone()
    }

    pub fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.chart.current()
    }

    pub fn history_series(&self) -> Option<Arc<HistorySeries>> {
        self.history.current()
    }

    pub fn catalog(&self) -> Option<&ModelCatalog> {
        self.catalog.as_ref()
    }

    pub fn begin_chart(&mut self) -> Generation {
        self.chart.begin()
    }

    pub fn begin_history(&mut self) -> Generation {
        self.history.begin()
    }

    /// Apply or report a chart outcome, unless a newer request superseded it.
    pub async fn complete_chart(
        &mut self,
        generation: Generation,
        outcome: DashboardResult<DashboardSnapshot>,
    ) -> Completion {
        let completion = self.chart.complete(generation, outcome);
        self.route(&completion).await;
        completion
    }

    pub async fn complete_history(
        &mut self,
        generation: Generation,
        outcome: DashboardResult<HistorySeries>,
    ) -> Completion {
        let completion = self.history.complete(generation, outcome);
        self.route(&completion).await;
        completion
    }

    /// Runs one request at a time; see the type docs for overlapping requests.
    pub async fn run_scenario(&mut self, config: RunConfig) -> Completion {
        self.chart_request(ScenarioRequest::Run(config)).await
    }

    pub async fn train_model(&mut self, config: TrainConfig) -> Completion {
        self.chart_request(ScenarioRequest::Train(config)).await
    }

    pub async fn load_history(&mut self, range: RangeConfig) -> Completion {
        let generation = self.begin_history();
        let outcome = self.fetcher.history(&range).await;
        self.complete_history(generation, outcome).await
    }

    pub async fn list_models(&mut self) -> Option<&ModelCatalog> {
        match self.fetcher.models().await {
            Ok(catalog) => {
                tracing::info!("{} models available", catalog.len());
                self.catalog = Some(catalog);
                self.catalog.as_ref()
            }
            Err(e) => {
                self.router.report(&e).await;
                None
            }
        }
    }

    pub async fn load_range(&mut self, range: RangeConfig) -> Option<String> {
        match self.fetcher.load(&range).await {
            Ok(body) => Some(body),
            Err(e) => {
                self.router.report(&e).await;
                None
            }
        }
    }

    /// Run any request and return the view to present, or `None` when the
    /// failure already went to the error channel.
    pub async fn execute(&mut self, request: ScenarioRequest) -> Option<View> {
        match request {
            ScenarioRequest::Run(_) | ScenarioRequest::Train(_) => {
                match self.chart_request(request).await {
                    Completion::Applied => self.snapshot().map(|s| View::Chart((*s).clone())),
                    _ => None,
                }
            }
            ScenarioRequest::History(range) => match self.load_history(range).await {
                Completion::Applied => self.history_series().map(|h| View::History((*h).clone())),
                _ => None,
            },
            ScenarioRequest::Models => self
                .list_models()
                .await
                .map(|catalog| View::Models(catalog.models().to_vec())),
            ScenarioRequest::Load(range) => self.load_range(range).await.map(View::Loaded),
        }
    }

    /// Session reset: forget every view and drop in-flight responses.
    pub fn reset(&mut self) {
        self.chart.reset();
        self.history.reset();
        self.catalog = None;
    }

    async fn chart_request(&mut self, request: ScenarioRequest) -> Completion {
        let generation = self.begin_chart();
        let outcome = self.fetcher.chart(&request).await;
        self.complete_chart(generation, outcome).await
    }

    async fn route(&self, completion: &Completion) {
        if let Completion::Failed(e) = completion {
            self.router.report(e).await;
        }
    }
}
