//! CSV export

use std::path::Path;

use csv::{Terminator, WriterBuilder};

use super::{ExportError, check_row_width, sanitize_header};
use crate::config::ExportConfig;
use crate::dataset::{DatasetProvider, Value};
use crate::extract::{Extraction, extract};

/// Write the dataset's attribute table to a UTF-8 CSV file, replacing `output`
pub fn export_csv(
    provider: &dyn DatasetProvider,
    config: &ExportConfig,
    dataset: &str,
    output: &Path,
) -> Result<(), ExportError> {
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: output.to_path_buf(),
        source,
    };

    let Extraction { columns, rows } = extract(provider, config, dataset)?;

    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_path(output)
        .map_err(csv_err)?;

    wtr.write_record(columns.iter().map(|c| sanitize_header(c)))
        .map_err(csv_err)?;

    let mut written = 0usize;
    for (index, row) in rows.enumerate() {
        let row = row?;
        check_row_width(index, columns.len(), &row)?;

        wtr.write_record(row.iter().map(Value::to_text))
            .map_err(csv_err)?;
        written += 1;
    }

    wtr.flush().map_err(|e| csv_err(e.into()))?;

    log::info!("CSV file exported to: {} ({} rows)", output.display(), written);
    Ok(())
}
