use chrono::{NaiveDate, Utc};
use scenario_core::{default_range, wire_day, DashboardError, DashboardResult, Operation, ScenarioParameters};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const DEFAULT_COIN: &str = "BTC";

/// Candle intervals (minutes) offered by the run form.
pub const INTERVAL_CHOICES: [u32; 9] = [1, 2, 3, 5, 10, 15, 20, 25, 30];

/// Coin plus day range; on its own this is the `load` / `history` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub coin: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Default for RangeConfig {
    fn default() -> Self {
        let (from, to) = default_range(Utc::now());
        Self {
            coin: DEFAULT_COIN.to_string(),
            from,
            to,
        }
    }
}

impl RangeConfig {
    pub fn new(coin: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            coin: coin.into(),
            from,
            to,
        }
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.coin.trim().is_empty() {
            return Err(DashboardError::invalid("coin must not be empty"));
        }
        if self.from > self.to {
            return Err(DashboardError::invalid(format!(
                "from ({}) is after to ({})",
                self.from, self.to
            )));
        }
        Ok(())
    }

    fn params(&self) -> ScenarioParameters {
        ScenarioParameters::new()
            .with("coin", self.coin.trim())
            .with("from", wire_day(self.from))
            .with("to", wire_day(self.to))
    }
}

/// Statistics-strategy backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub range: RangeConfig,
    /// Candle length in minutes.
    pub interval: u32,
    /// Look-back window, in candles.
    pub prev: u32,
    /// Look-ahead window, in candles.
    pub next: u32,
    pub threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            range: RangeConfig::default(),
            interval: 15,
            prev: 3,
            next: 1,
            threshold: 0.0,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        self.range.validate()?;
        if !INTERVAL_CHOICES.contains(&self.interval) {
            return Err(DashboardError::invalid(format!(
                "interval {} is not one of {:?}",
                self.interval, INTERVAL_CHOICES
            )));
        }
        within("prev", self.prev, 0, 10)?;
        within("next", self.next, 0, 10)?;
        within("threshold", self.threshold, 0.0, 1.0)?;
        Ok(())
    }
}

/// Take-profit / stop-loss and the trader's price filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    pub buffer_time: f64,
    pub price_threshold: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl RiskConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        for (name, value) in [
            ("buffer_time", self.buffer_time),
            ("price_threshold", self.price_threshold),
            ("stop_loss", self.stop_loss),
            ("take_profit", self.take_profit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DashboardError::invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Model training / evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub range: RangeConfig,
    /// Pre-trained models to evaluate; empty trains from scratch.
    pub models: Vec<String>,
    pub precision: f64,
    pub size: u32,
    pub buffer: u32,
    pub features: u32,
    pub look_back: u32,
    pub look_ahead: u32,
    pub gap: f64,
    pub risk: RiskConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            range: RangeConfig::default(),
            models: Vec::new(),
            precision: 0.51,
            size: 100,
            buffer: 50,
            features: 3,
            look_back: 9,
            look_ahead: 1,
            gap: 0.75,
            risk: RiskConfig::default(),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        self.range.validate()?;
        if let Some(blank) = self.models.iter().position(|m| m.trim().is_empty()) {
            return Err(DashboardError::invalid(format!("model #{} is blank", blank + 1)));
        }
        within("precision", self.precision, 0.0, 1.0)?;
        within("size", self.size, 10, 1000)?;
        within("buffer", self.buffer, 10, 100)?;
        within("features", self.features, 1, 10)?;
        within("look_back", self.look_back, 3, 30)?;
        within("look_ahead", self.look_ahead, 1, 30)?;
        within("gap", self.gap, 0.5, 1.0)?;
        self.risk.validate()
    }
}

fn within<T: PartialOrd + Display>(name: &str, value: T, min: T, max: T) -> DashboardResult<()> {
    // NaN fails both comparisons and is rejected too.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(DashboardError::invalid(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )))
    }
}

/// A user-triggered backend request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum ScenarioRequest {
    Run(RunConfig),
    Train(TrainConfig),
    Load(RangeConfig),
    History(RangeConfig),
    Models,
}

impl ScenarioRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ScenarioRequest::Run(_) => Operation::Run,
            ScenarioRequest::Train(_) => Operation::Train,
            ScenarioRequest::Load(_) => Operation::Load,
            ScenarioRequest::History(_) => Operation::History,
            ScenarioRequest::Models => Operation::Models,
        }
    }
}

/// Turns validated form configuration into wire parameters.
///
/// Numbers go out exactly as entered; dates are day-level `YYYY_MM_DDT00`.
pub struct ScenarioRequestBuilder;

impl ScenarioRequestBuilder {
    pub fn build(request: &ScenarioRequest) -> DashboardResult<ScenarioParameters> {
        match request {
            ScenarioRequest::Run(config) => Self::run(config),
            ScenarioRequest::Train(config) => Self::train(config),
            ScenarioRequest::Load(range) => Self::load(range),
            ScenarioRequest::History(range) => Self::history(range),
            ScenarioRequest::Models => Ok(Self::models()),
        }
    }

    pub fn run(config: &RunConfig) -> DashboardResult<ScenarioParameters> {
        config.validate()?;
        Ok(config
            .range
            .params()
            .with("interval", config.interval)
            .with("prev", config.prev)
            .with("next", config.next)
            .with("threshold", config.threshold))
    }

    pub fn train(config: &TrainConfig) -> DashboardResult<ScenarioParameters> {
        config.validate()?;
        Ok(config
            .range
            .params()
            .with("model", config.models.clone())
            .with("precision", config.precision)
            .with("size", config.size)
            .with("buffer", config.buffer)
            .with("features", config.features)
            .with("look_back", config.look_back)
            .with("look_ahead", config.look_ahead)
            .with("gap", config.gap)
            .with("buffer_time", config.risk.buffer_time)
            .with("price_threshold", config.risk.price_threshold)
            .with("stop_loss", config.risk.stop_loss)
            .with("take_profit", config.risk.take_profit))
    }

    pub fn load(range: &RangeConfig) -> DashboardResult<ScenarioParameters> {
        range.validate()?;
        Ok(range.params())
    }

    pub fn history(range: &RangeConfig) -> DashboardResult<ScenarioParameters> {
        range.validate()?;
        Ok(range.params())
    }

    pub fn models() -> ScenarioParameters {
        ScenarioParameters::new()
    }
}
