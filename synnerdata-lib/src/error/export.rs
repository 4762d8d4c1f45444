//! Export error types

/// Errors that can occur while exporting rows to a spreadsheet.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The input was not an array of row objects.
    #[error("Invalid export input: {0}")]
    InvalidInput(String),

    /// The workbook could not be produced.
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The file could not be written.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Creates a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
