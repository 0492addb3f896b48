use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::ConfigError;

/// One narrative risk category and the sentences that define it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tick {
    pub name: String,
    pub examples: Vec<String>,
}

/// The full category dataset, in file order.
///
/// File order is significant: it is the tie-break order when ranking scores.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TickDataset {
    ticks: Vec<Tick>,
}

impl TickDataset {
    /// Build a dataset from `(name, examples)` pairs, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DatasetValidation`] if a name is blank or repeated,
    /// a category has no examples, or an example is blank.
    pub fn from_pairs<I, N, E>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (N, Vec<E>)>,
        N: Into<String>,
        E: Into<String>,
    {
        let ticks = pairs
            .into_iter()
            .map(|(name, examples)| Tick {
                name: name.into(),
                examples: examples.into_iter().map(Into::into).collect(),
            })
            .collect();
        let dataset = Self { ticks };
        validate_ticks(&dataset)?;
        Ok(dataset)
    }

    /// Parse a dataset from its JSON form: `{"<tick>": ["sentence", ...], ...}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DatasetParse`] if the document is not an object of
    /// string arrays, or [`ConfigError::DatasetValidation`] if it fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: IndexMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_pairs(raw)
    }

    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Total number of example sentences across all categories.
    #[must_use]
    pub fn example_count(&self) -> usize {
        self.ticks.iter().map(|t| t.examples.len()).sum()
    }
}

/// Load and validate the tick dataset from a JSON file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_ticks(path: &Path) -> Result<TickDataset, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DatasetIo {
        path: path.display().to_string(),
        source: e,
    })?;

    TickDataset::from_json_str(&content)
}

fn validate_ticks(dataset: &TickDataset) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for tick in &dataset.ticks {
        let name = tick.name.trim();
        if name.is_empty() {
            return Err(ConfigError::DatasetValidation(
                "tick name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(name.to_string()) {
            return Err(ConfigError::DatasetValidation(format!(
                "duplicate tick name: '{name}'"
            )));
        }

        if tick.examples.is_empty() {
            return Err(ConfigError::DatasetValidation(format!(
                "tick '{name}' has no example sentences"
            )));
        }

        if let Some(idx) = tick.examples.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::DatasetValidation(format!(
                "tick '{name}' has a blank example sentence at index {idx}"
            )));
        }
    }

    Ok(())
}
