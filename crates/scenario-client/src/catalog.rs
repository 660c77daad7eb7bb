use scenario_core::ModelDescriptor;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Separator between the segments of a stored model identifier.
pub const MODEL_ID_DELIMITER: char = '_';

/// Split `<COIN>_<DURATION>_<..>_<ACCURACY>...` into its parts.
///
/// Identifiers with fewer segments are kept; the missing parts come back
/// empty or `None` rather than dropping the model from the picker.
pub fn parse_model_id(id: &str) -> ModelDescriptor {
    let parts: Vec<&str> = id.split(MODEL_ID_DELIMITER).collect();
    ModelDescriptor {
        title: id.to_string(),
        coin: parts.first().copied().unwrap_or_default().to_string(),
        duration: parts.get(1).copied().unwrap_or_default().to_string(),
        accuracy: parts.get(3).and_then(|raw| leading_float(raw)),
    }
}

/// Parse the longest numeric prefix, so `0.71.json` reads as `0.71`.
fn leading_float(raw: &str) -> Option<f64> {
    let numeric: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();
    (1..=numeric.len())
        .rev()
        .find_map(|end| numeric[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Models available for selection, best accuracy first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut models: Vec<ModelDescriptor> =
            ids.into_iter().map(|id| parse_model_id(id.as_ref())).collect();
        models.sort_by(by_accuracy_desc);
        Self { models }
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn for_coin(&self, coin: &str) -> Vec<&ModelDescriptor> {
        self.models.iter().filter(|m| m.coin == coin).collect()
    }

    /// Picker groups: coin → models, each group still best-first.
    pub fn grouped_by_coin(&self) -> BTreeMap<&str, Vec<&ModelDescriptor>> {
        let mut groups: BTreeMap<&str, Vec<&ModelDescriptor>> = BTreeMap::new();
        for model in &self.models {
            groups.entry(model.coin.as_str()).or_default().push(model);
        }
        groups
    }
}

fn by_accuracy_desc(a: &ModelDescriptor, b: &ModelDescriptor) -> Ordering {
    match (a.accuracy, b.accuracy) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
