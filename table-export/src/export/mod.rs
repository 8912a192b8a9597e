//! Export of a dataset's attribute table to CSV or a spreadsheet

pub mod csv_exporter;
pub mod xls;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::ExportConfig;
use crate::dataset::{DatasetProvider, ProviderError, Row};
use crate::diagnostics::DiagnosticSink;

pub use csv_exporter::export_csv;
pub use xls::{SpreadsheetCapability, export_xls};

/// Everything that can stop an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Don't know how to export to {0:?} (expected \"CSV\" or \"XLS\")")]
    UnsupportedFormat(String),

    #[error("failed to load spreadsheet writer: {0}")]
    SpreadsheetUnavailable(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Row {row} has {actual} values but the header has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Column {column} is beyond the last column a worksheet can address")]
    ColumnOutOfRange { column: usize },

    #[error("Failed to write CSV file: {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[cfg(feature = "xls")]
    #[error("Failed to write spreadsheet")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[cfg(feature = "xls")]
    #[error("Failed to save Excel file: {}", .path.display())]
    SaveSpreadsheet {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Output format selector, matched literally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xls,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CSV" => Ok(ExportFormat::Csv),
            "XLS" => Ok(ExportFormat::Xls),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Run one export
///
/// CSV failures are returned to the caller. Spreadsheet failures are reported
/// through `sink` with their full cause chain and the call still succeeds.
pub fn run_export(
    provider: &dyn DatasetProvider,
    config: &ExportConfig,
    sink: &mut dyn DiagnosticSink,
    dataset: &str,
    output: &Path,
    format: &str,
) -> Result<(), ExportError> {
    match format.parse::<ExportFormat>()? {
        ExportFormat::Csv => export_csv(provider, config, dataset, output),
        ExportFormat::Xls => {
            let capability = SpreadsheetCapability::detect();
            if let Err(e) = export_xls(provider, config, sink, dataset, output, &capability) {
                let report = anyhow::Error::new(e).context(format!(
                    "Failed to export {} to {}",
                    dataset,
                    output.display()
                ));
                sink.report_error(&format!("{:?}", report));
            }
            Ok(())
        }
    }
}

/// Header cell text: provider-qualified names like `table.field` become `table_field`
pub fn sanitize_header(name: &str) -> String {
    name.replace('.', "_")
}

/// Fail if a row does not line up with the header
///
/// `index` is the zero-based data row index; errors report it one-based.
pub(crate) fn check_row_width(index: usize, expected: usize, row: &Row) -> Result<(), ExportError> {
    if row.len() != expected {
        return Err(ExportError::RowWidth {
            row: index + 1,
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}
