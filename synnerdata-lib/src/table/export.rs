//! Spreadsheet export of the filtered rows.

use std::path::Path;
use std::path::PathBuf;

use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;

use super::render;
use super::schema::Schema;
use crate::error::ExportError;
use crate::model::Row;
use crate::model::Value;

/// Worksheet name used for every export.
pub const SHEET_NAME: &str = "Dados";

const EXTENSION: &str = ".xlsx";

/// One exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Number(f64),
    Text(String),
}

impl ExportCell {
    fn from_value(value: Option<Value>) -> Self {
        let Some(value) = value else {
            return ExportCell::Text(String::new());
        };
        match value {
            Value::Null => ExportCell::Text(String::new()),
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => match value.as_f64() {
                Some(n) if n.is_finite() => ExportCell::Number(n),
                _ => ExportCell::Text(value.to_text()),
            },
            Value::Bool(b) => ExportCell::Text(render::yes_no(b).to_string()),
            Value::Date(_) | Value::DateTime(_) => ExportCell::Text(
                value
                    .as_datetime()
                    .map(render::format_date)
                    .unwrap_or_default(),
            ),
            Value::String(s) => ExportCell::Text(s),
            Value::Json(json) => ExportCell::Text(match json {
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            }),
        }
    }

    /// Cell content as text, numbers in their plain form.
    pub fn as_text(&self) -> String {
        match self {
            ExportCell::Number(n) => n.to_string(),
            ExportCell::Text(s) => s.clone(),
        }
    }
}

/// Headers plus one line of cells per row, ready to be written out.
///
/// Every column except the actions column is included, hidden ones too.
/// Cells come from the raw column value, not the display renderer, so
/// numbers stay numeric in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    sheet_name: String,
    headers: Vec<String>,
    rows: Vec<Vec<ExportCell>>,
}

impl ExportDocument {
    pub fn build<'a>(rows: impl IntoIterator<Item = &'a Row>, schema: &Schema) -> Self {
        let columns: Vec<_> = schema.data_columns().collect();
        let headers = columns.iter().map(|c| c.header()).collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| ExportCell::from_value(schema.value(row, column)))
                    .collect()
            })
            .collect();

        Self {
            sheet_name: SHEET_NAME.to_string(),
            headers,
            rows,
        }
    }

    /// Overrides the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<ExportCell>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the document as an XLSX workbook with a bold header row.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col_index(col)?, header, &bold)?;
        }

        for (i, cells) in self.rows.iter().enumerate() {
            let row = u32::try_from(i + 1)
                .map_err(|_| ExportError::invalid_input("too many rows for one worksheet"))?;
            for (col, cell) in cells.iter().enumerate() {
                let col = col_index(col)?;
                match cell {
                    ExportCell::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    ExportCell::Text(s) if s.is_empty() => {}
                    ExportCell::Text(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                }
            }
        }

        worksheet.autofit();
        Ok(workbook.save_to_buffer()?)
    }
}

fn col_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::invalid_input("too many columns for one worksheet"))
}

/// A generated file waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Writes the file into `dir` and returns its path.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::info!("export written to {}", path.display());
        Ok(path)
    }
}

/// Exports rows to an XLSX file named after `filename`.
///
/// Pass the filtered rows, not a page. An empty set yields a header-only
/// workbook.
pub fn export_rows<'a>(
    rows: impl IntoIterator<Item = &'a Row>,
    schema: &Schema,
    filename: &str,
) -> Result<Export, ExportError> {
    let document = ExportDocument::build(rows, schema);
    export_document(&document, filename)
}

/// Exports a document built elsewhere, e.g. with a custom sheet name.
pub fn export_document(document: &ExportDocument, filename: &str) -> Result<Export, ExportError> {
    let bytes = document.to_xlsx()?;
    let filename = export_filename(filename);
    log::info!("exported {} rows to {}", document.len(), filename);
    Ok(Export { filename, bytes })
}

/// Exports untyped JSON rows.
///
/// Fails with [`ExportError::InvalidInput`] unless `rows` is an array of
/// objects.
pub fn export_json(
    rows: serde_json::Value,
    schema: &Schema,
    filename: &str,
) -> Result<Export, ExportError> {
    let rows = Row::list_from_json(rows)?;
    export_rows(&rows, schema, filename)
}

/// Appends `.xlsx` when missing; blank names become `dados.xlsx`.
///
/// Directory parts are dropped so [`Export::save`] always writes inside its
/// target directory.
pub fn export_filename(name: &str) -> String {
    let name = Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .trim();
    if name.is_empty() {
        return format!("dados{}", EXTENSION);
    }
    if name.to_ascii_lowercase().ends_with(EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, EXTENSION)
    }
}
