//! The provider trait and its two cursor shapes

use std::collections::HashMap;

use thiserror::Error;

use super::{FieldDescriptor, ProviderVersion, Value};

/// One record, values aligned with the requested column list
pub type Row = Vec<Value>;

/// Column-projecting cursor: yields rows already in the requested column order
pub type ProjectedCursor<'a> = Box<dyn Iterator<Item = Result<Row, ProviderError>> + 'a>;

/// Error raised by a provider while describing or reading a dataset
#[derive(Debug, Error)]
#[error("Failed to read dataset {dataset}: {message}")]
pub struct ProviderError {
    pub dataset: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            message: message.into(),
        }
    }
}

/// Row object handed out by a step cursor; columns are looked up by name
#[derive(Debug, Clone, Default)]
pub struct StepRow {
    values: HashMap<String, Value>,
}

impl StepRow {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

impl FromIterator<(String, Value)> for StepRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Step cursor: "give me the next row, or tell me you are done"
pub trait StepCursor {
    fn next_row(&mut self) -> Result<Option<StepRow>, ProviderError>;
}

/// A source of geospatial datasets
///
/// Cursors borrow the provider and hold their read handle until dropped.
pub trait DatasetProvider {
    /// Version of the provider API, used to pick a cursor shape
    fn version(&self) -> ProviderVersion;

    /// Field descriptors in declared order
    fn describe_fields(&self, dataset: &str) -> Result<Vec<FieldDescriptor>, ProviderError>;

    /// Open a step cursor over every field of the dataset
    fn step_cursor<'a>(&'a self, dataset: &str) -> Result<Box<dyn StepCursor + 'a>, ProviderError>;

    /// Open a cursor yielding only `columns`, in that order
    fn projected_cursor<'a>(
        &'a self,
        dataset: &str,
        columns: &[String],
    ) -> Result<ProjectedCursor<'a>, ProviderError>;
}
