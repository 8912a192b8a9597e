//! Schema and row extraction
//!
//! [`extract`] turns a dataset into the list of exportable column names plus a
//! lazy, single-pass [`Rows`] iterator. The cursor shape is chosen once from
//! the configured provider version; callers only ever see `Row`s.

use crate::config::ExportConfig;
use crate::dataset::{
    DatasetProvider, FieldDescriptor, ProjectedCursor, ProviderError, ProviderVersion, Row,
    StepCursor, Value,
};

/// Which cursor shape to read rows with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAccess {
    /// Step cursor, each column fetched from the row object by name
    Step,
    /// Cursor that projects the requested columns itself
    Projected,
}

impl RowAccess {
    pub fn for_version(version: ProviderVersion) -> Self {
        if version.has_projected_cursor() {
            RowAccess::Projected
        } else {
            RowAccess::Step
        }
    }
}

/// Exportable columns of a dataset and an open cursor over its rows
pub struct Extraction<'a> {
    pub columns: Vec<String>,
    pub rows: Rows<'a>,
}

/// Names of the scalar fields, in declared order
pub fn exportable_columns(fields: &[FieldDescriptor]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.field_type.is_exportable())
        .map(|f| f.name.clone())
        .collect()
}

/// Describe `dataset` and open a cursor over its exportable columns
pub fn extract<'a>(
    provider: &'a dyn DatasetProvider,
    config: &ExportConfig,
    dataset: &str,
) -> Result<Extraction<'a>, ProviderError> {
    let fields = provider.describe_fields(dataset)?;
    let columns = exportable_columns(&fields);

    let access = RowAccess::for_version(config.provider_version);
    log::debug!(
        "Reading {} ({} of {} fields) with {:?} cursor",
        dataset,
        columns.len(),
        fields.len(),
        access
    );

    let source = match access {
        RowAccess::Step => RowSource::Step {
            cursor: provider.step_cursor(dataset)?,
            columns: columns.clone(),
        },
        RowAccess::Projected => RowSource::Projected(provider.projected_cursor(dataset, &columns)?),
    };

    Ok(Extraction {
        columns,
        rows: Rows {
            dataset: dataset.to_string(),
            source,
        },
    })
}

enum RowSource<'a> {
    Step {
        cursor: Box<dyn StepCursor + 'a>,
        columns: Vec<String>,
    },
    Projected(ProjectedCursor<'a>),
    Released,
}

/// Forward-only rows of one dataset
///
/// The underlying cursor is released as soon as the rows run out or a read
/// fails, and otherwise when the iterator is dropped. After that it only
/// yields `None`.
pub struct Rows<'a> {
    dataset: String,
    source: RowSource<'a>,
}

impl Rows<'_> {
    fn release(&mut self) {
        if !matches!(self.source, RowSource::Released) {
            log::debug!("Releasing cursor on {}", self.dataset);
            self.source = RowSource::Released;
        }
    }

    fn fetch(&mut self) -> Option<Result<Row, ProviderError>> {
        match &mut self.source {
            RowSource::Step { cursor, columns } => match cursor.next_row() {
                Ok(Some(row)) => Some(
                    columns
                        .iter()
                        .map(|column| {
                            row.get(column).cloned().ok_or_else(|| {
                                ProviderError::new(
                                    &self.dataset,
                                    format!("row has no value for field {}", column),
                                )
                            })
                        })
                        .collect::<Result<Vec<Value>, _>>(),
                ),
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            },
            RowSource::Projected(cursor) => cursor.next(),
            RowSource::Released => None,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, ProviderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.fetch();
        if !matches!(item, Some(Ok(_))) {
            self.release();
        }
        item
    }
}

impl Drop for Rows<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
