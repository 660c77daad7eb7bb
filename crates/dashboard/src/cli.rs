//! Command-line front end: `dashboard <command> [--flag value]...`.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use scenario_client::{RangeConfig, RunConfig, ScenarioRequest, TrainConfig};
use std::collections::HashMap;
use std::str::FromStr;

pub const USAGE: &str = "\
Usage:
  dashboard run      [--coin C] [--from YYYY-MM-DD] [--to YYYY-MM-DD]
                     [--interval N] [--prev N] [--next N] [--threshold X]
  dashboard train    [--coin C] [--from ..] [--to ..] [--model ID]...
                     [--precision X] [--size N] [--buffer N] [--features N]
                     [--look-back N] [--look-ahead N] [--gap X]
                     [--buffer-time X] [--price-threshold X]
                     [--stop-loss X] [--take-profit X]
  dashboard history  [--coin C] [--from ..] [--to ..]
  dashboard load     [--coin C] [--from ..] [--to ..]
  dashboard models

Environment:
  BACKTEST_BASE_URL    backend root (default http://localhost:6090/test)
  BACKTEST_TIMEOUT_MS  request timeout (default 20000)
  RUST_LOG             log filter (default info)
  RUST_LOG_FORMAT      set to 'json' for JSON logs";

const RANGE_FLAGS: &[&str] = &["coin", "from", "to"];
const RUN_FLAGS: &[&str] = &["interval", "prev", "next", "threshold"];
const TRAIN_FLAGS: &[&str] = &[
    "model",
    "precision",
    "size",
    "buffer",
    "features",
    "look-back",
    "look-ahead",
    "gap",
    "buffer-time",
    "price-threshold",
    "stop-loss",
    "take-profit",
];

/// Parsed `--flag value` pairs; repeated flags keep every value in order.
struct Flags {
    values: HashMap<String, Vec<String>>,
}

impl Flags {
    fn parse(args: &[String], allowed: &[&[&str]]) -> Result<Self> {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let name = arg
                .strip_prefix("--")
                .ok_or_else(|| anyhow!("unexpected argument '{}'", arg))?;
            if !allowed.iter().any(|group| group.contains(&name)) {
                bail!("unknown flag '--{}'", name);
            }
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("flag '--{}' needs a value", name))?;
            values.entry(name.to_string()).or_default().push(value.clone());
        }
        Ok(Self { values })
    }

    fn last(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.last()).map(String::as_str)
    }

    fn all(&self, name: &str) -> Vec<String> {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn number<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.last(name) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("'--{} {}' is not a number", name, raw)),
            None => Ok(default),
        }
    }

    fn date(&self, name: &str, default: NaiveDate) -> Result<NaiveDate> {
        match self.last(name) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("'--{} {}' is not a YYYY-MM-DD date", name, raw)),
            None => Ok(default),
        }
    }

    fn range(&self) -> Result<RangeConfig> {
        let defaults = RangeConfig::default();
        Ok(RangeConfig {
            coin: self.last("coin").map(str::to_string).unwrap_or(defaults.coin),
            from: self.date("from", defaults.from)?,
            to: self.date("to", defaults.to)?,
        })
    }
}

pub fn parse_args(args: &[String]) -> Result<ScenarioRequest> {
    let (command, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("missing command"))?;

    match command.as_str() {
        "run" => {
            let flags = Flags::parse(rest, &[RANGE_FLAGS, RUN_FLAGS])?;
            let defaults = RunConfig::default();
            Ok(ScenarioRequest::Run(RunConfig {
                range: flags.range()?,
                interval: flags.number("interval", defaults.interval)?,
                prev: flags.number("prev", defaults.prev)?,
                next: flags.number("next", defaults.next)?,
                threshold: flags.number("threshold", defaults.threshold)?,
            }))
        }
        "train" => {
            let flags = Flags::parse(rest, &[RANGE_FLAGS, TRAIN_FLAGS])?;
            let defaults = TrainConfig::default();
            let mut risk = defaults.risk.clone();
            risk.buffer_time = flags.number("buffer-time", risk.buffer_time)?;
            risk.price_threshold = flags.number("price-threshold", risk.price_threshold)?;
            risk.stop_loss = flags.number("stop-loss", risk.stop_loss)?;
            risk.take_profit = flags.number("take-profit", risk.take_profit)?;
            Ok(ScenarioRequest::Train(TrainConfig {
                range: flags.range()?,
                models: flags.all("model"),
                precision: flags.number("precision", defaults.precision)?,
                size: flags.number("size", defaults.size)?,
                buffer: flags.number("buffer", defaults.buffer)?,
                features: flags.number("features", defaults.features)?,
                look_back: flags.number("look-back", defaults.look_back)?,
                look_ahead: flags.number("look-ahead", defaults.look_ahead)?,
                gap: flags.number("gap", defaults.gap)?,
                risk,
            }))
        }
        "history" => Ok(ScenarioRequest::History(
            Flags::parse(rest, &[RANGE_FLAGS])?.range()?,
        )),
        "load" => Ok(ScenarioRequest::Load(Flags::parse(rest, &[RANGE_FLAGS])?.range()?)),
        "models" => {
            Flags::parse(rest, &[])?;
            Ok(ScenarioRequest::Models)
        }
        other => bail!("unknown command '{}'", other),
    }
}
