//! Spreadsheet export
//!
//! One worksheet named after the dataset, a bold centred header row that stays
//! frozen while scrolling, and typed cells below it. The writer lives behind
//! the `xls` cargo feature; a build without it reports the missing capability
//! and writes nothing.

use std::path::Path;

use super::ExportError;
use crate::config::ExportConfig;
use crate::dataset::DatasetProvider;
use crate::diagnostics::DiagnosticSink;
use crate::extract::{Extraction, extract};

/// Longest sheet name a workbook accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Number format applied to date cells
pub const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Whether a spreadsheet writer is available in this build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetCapability {
    Available,
    Unavailable(String),
}

impl SpreadsheetCapability {
    pub fn detect() -> Self {
        if cfg!(feature = "xls") {
            SpreadsheetCapability::Available
        } else {
            SpreadsheetCapability::Unavailable(
                "this build does not include the `xls` feature".to_string(),
            )
        }
    }
}

/// Write the dataset's attribute table to a single-sheet workbook, replacing `output`
///
/// A missing writer is reported through `sink` and is not an error.
pub fn export_xls(
    provider: &dyn DatasetProvider,
    config: &ExportConfig,
    sink: &mut dyn DiagnosticSink,
    dataset: &str,
    output: &Path,
    capability: &SpreadsheetCapability,
) -> Result<(), ExportError> {
    if let SpreadsheetCapability::Unavailable(reason) = capability {
        sink.report_error(&ExportError::SpreadsheetUnavailable(reason.clone()).to_string());
        return Ok(());
    }

    if has_legacy_extension(output) {
        log::warn!(
            "{} will hold an .xlsx workbook; Excel may warn that the extension does not match",
            output.display()
        );
    }

    let Extraction { columns, rows } = extract(provider, config, dataset)?;
    let sheet = sheet_name(dataset);

    let written = writer::write_workbook(&columns, rows, &sheet, output)?;

    log::info!("Excel file exported to: {} ({} rows)", output.display(), written);
    Ok(())
}

/// Whether `output` is named like a legacy `.xls` workbook
pub fn has_legacy_extension(output: &Path) -> bool {
    output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xls"))
}

/// Worksheet column number for a zero-based column position
pub fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::ColumnOutOfRange { column: col + 1 })
}

/// Sheet name for a dataset: its base name, cleaned up to what workbooks accept
pub fn sheet_name(dataset: &str) -> String {
    let base = dataset
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(dataset);

    let cleaned: String = base
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .collect();
    let truncated: String = cleaned
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let name = truncated.trim_end_matches('\'');

    if name.is_empty() {
        "Sheet1".to_string()
    } else if name.eq_ignore_ascii_case("history") {
        // Reserved by Excel
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

#[cfg(feature = "xls")]
mod writer {
    use std::path::Path;

    use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

    use super::{DATE_NUM_FORMAT, column_index};
    use crate::dataset::Value;
    use crate::export::{ExportError, check_row_width, sanitize_header};
    use crate::extract::Rows;

    pub fn header_format() -> Format {
        Format::new().set_bold().set_align(FormatAlign::Center)
    }

    /// Returns the number of data rows written
    pub fn write_workbook(
        columns: &[String],
        rows: Rows<'_>,
        sheet: &str,
        output: &Path,
    ) -> Result<usize, ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet)?;

        let header_format = header_format();
        for (col, name) in columns.iter().enumerate() {
            let col = column_index(col)?;
            worksheet.write_string_with_format(0, col, sanitize_header(name), &header_format)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);
        let mut written = 0usize;
        for (index, row) in rows.enumerate() {
            let row = row?;
            check_row_width(index, columns.len(), &row)?;

            let row_num = (index + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                write_value(worksheet, row_num, column_index(col)?, value, &date_format)?;
            }
            written += 1;
        }

        workbook
            .save(output)
            .map_err(|source| ExportError::SaveSpreadsheet {
                path: output.to_path_buf(),
                source,
            })?;

        Ok(written)
    }

    fn write_value(
        ws: &mut Worksheet,
        row: u32,
        col: u16,
        value: &Value,
        date_format: &Format,
    ) -> Result<(), ExportError> {
        match value {
            Value::Null => { /* Leave cell empty */ }
            Value::String(s) => { ws.write_string(row, col, s)?; }
            Value::Int(i) => { ws.write_number(row, col, *i as f64)?; }
            Value::Float(f) => { ws.write_number(row, col, *f)?; }
            Value::Bool(b) => { ws.write_boolean(row, col, *b)?; }
            Value::Date(dt) => { ws.write_datetime_with_format(row, col, dt, date_format)?; }
        }
        Ok(())
    }
}

#[cfg(not(feature = "xls"))]
mod writer {
    use std::path::Path;

    use crate::export::ExportError;
    use crate::extract::Rows;

    pub fn write_workbook(
        _columns: &[String],
        _rows: Rows<'_>,
        _sheet: &str,
        _output: &Path,
    ) -> Result<usize, ExportError> {
        Err(ExportError::SpreadsheetUnavailable(
            "this build does not include the `xls` feature".to_string(),
        ))
    }
}
