//! In-memory provider for tests
//!
//! Rows are stored full width (one value per declared field). Every cursor
//! bumps a shared counter when dropped so tests can check release.

use std::cell::Cell;
use std::collections::HashMap;

use super::{
    DatasetProvider, FieldDescriptor, ProjectedCursor, ProviderError, ProviderVersion, Row,
    StepCursor, StepRow,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    pub fields: Vec<FieldDescriptor>,
    pub rows: Vec<Row>,
    /// Fail with a provider error when this row index is reached
    pub fail_at: Option<usize>,
    /// Drop the last value of this row in projected cursors
    pub short_row: Option<usize>,
}

impl MemoryDataset {
    pub fn new(fields: Vec<FieldDescriptor>, rows: Vec<Row>) -> Self {
        Self {
            fields,
            rows,
            ..Default::default()
        }
    }
}

pub struct MemoryProvider {
    version: ProviderVersion,
    datasets: HashMap<String, MemoryDataset>,
    released: Cell<usize>,
}

impl MemoryProvider {
    pub fn new(version: ProviderVersion) -> Self {
        Self {
            version,
            datasets: HashMap::new(),
            released: Cell::new(0),
        }
    }

    pub fn with_dataset(mut self, name: &str, dataset: MemoryDataset) -> Self {
        self.datasets.insert(name.to_string(), dataset);
        self
    }

    /// Number of cursors dropped so far
    pub fn released(&self) -> usize {
        self.released.get()
    }

    fn dataset(&self, name: &str) -> Result<&MemoryDataset, ProviderError> {
        self.datasets
            .get(name)
            .ok_or_else(|| ProviderError::new(name, "dataset does not exist"))
    }
}

struct ReleaseGuard<'a>(&'a Cell<usize>);

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

struct MemoryStepCursor<'a> {
    name: String,
    dataset: &'a MemoryDataset,
    position: usize,
    _guard: ReleaseGuard<'a>,
}

impl StepCursor for MemoryStepCursor<'_> {
    fn next_row(&mut self) -> Result<Option<StepRow>, ProviderError> {
        if self.dataset.fail_at == Some(self.position) {
            return Err(ProviderError::new(&self.name, "row fetch failed"));
        }

        let Some(row) = self.dataset.rows.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;

        Ok(Some(
            self.dataset
                .fields
                .iter()
                .zip(row.iter())
                .map(|(field, value)| (field.name.clone(), value.clone()))
                .collect(),
        ))
    }
}

impl DatasetProvider for MemoryProvider {
    fn version(&self) -> ProviderVersion {
        self.version
    }

    fn describe_fields(&self, dataset: &str) -> Result<Vec<FieldDescriptor>, ProviderError> {
        Ok(self.dataset(dataset)?.fields.clone())
    }

    fn step_cursor<'a>(&'a self, dataset: &str) -> Result<Box<dyn StepCursor + 'a>, ProviderError> {
        Ok(Box::new(MemoryStepCursor {
            name: dataset.to_string(),
            dataset: self.dataset(dataset)?,
            position: 0,
            _guard: ReleaseGuard(&self.released),
        }))
    }

    fn projected_cursor<'a>(
        &'a self,
        dataset: &str,
        columns: &[String],
    ) -> Result<ProjectedCursor<'a>, ProviderError> {
        let data = self.dataset(dataset)?;
        let indices = columns
            .iter()
            .map(|column| {
                data.fields
                    .iter()
                    .position(|f| &f.name == column)
                    .ok_or_else(|| ProviderError::new(dataset, format!("field not found: {}", column)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let name = dataset.to_string();
        let guard = ReleaseGuard(&self.released);

        Ok(Box::new(data.rows.iter().enumerate().map(move |(position, row)| {
            let _held = &guard;
            if data.fail_at == Some(position) {
                return Err(ProviderError::new(&name, "row fetch failed"));
            }

            let mut projected: Row = indices.iter().map(|&i| row[i].clone()).collect();
            if data.short_row == Some(position) {
                projected.pop();
            }
            Ok(projected)
        })))
    }
}

