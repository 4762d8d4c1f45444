//! Table schema and view-state errors

/// Errors raised when a table schema or its view-state is misused.
///
/// Malformed row data never produces one of these; the engine degrades to
/// non-matching or empty cells instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two columns share the same key.
    #[error("Duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// A column key is empty.
    #[error("Column key must not be empty")]
    EmptyColumnKey,

    /// No column with this key exists.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// A filter was set on a column not marked filterable.
    #[error("Column '{0}' is not filterable")]
    NotFilterable(String),

    /// A sort was requested on a column not marked sortable.
    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    /// A computed accessor names no registered function.
    #[error("Column '{column}' uses unknown accessor '{accessor}'")]
    UnknownAccessor { column: String, accessor: String },

    /// A custom renderer names no registered function.
    #[error("Column '{column}' uses unknown renderer '{renderer}'")]
    UnknownRenderer { column: String, renderer: String },

    /// The filter value shape does not fit the column's filter kind.
    #[error("Column '{column}' expects a {expected} filter")]
    FilterMismatch {
        column: String,
        expected: &'static str,
    },

    /// Page size must be greater than zero.
    #[error("Page size must be greater than zero")]
    InvalidPageSize,
}
