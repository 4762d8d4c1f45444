//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use super::export::SHEET_NAME;
use super::page::DEFAULT_PAGE_SIZE;
use super::page::PAGE_SIZE_OPTIONS;

/// Settings applied when a [`DataTable`](super::DataTable) is created.
///
/// # Example
///
/// ```
/// use synnerdata_lib::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_page_size(20)
///     .with_search(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Initial page size.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page sizes offered in the page-size selector.
    ///
    /// Default: 10, 20, 30, 40, 50
    pub page_size_options: Vec<usize>,

    /// Whether the global search box takes part in filtering.
    ///
    /// Default: true
    pub search_enabled: bool,

    /// Worksheet name for exports.
    ///
    /// Default: "Dados"
    pub sheet_name: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            search_enabled: true,
            sheet_name: SHEET_NAME.to_string(),
        }
    }
}

impl TableConfig {
    /// Creates a new table config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page size options.
    pub fn with_page_size_options(mut self, options: impl IntoIterator<Item = usize>) -> Self {
        self.page_size_options = options.into_iter().collect();
        self
    }

    /// Enables or disables the global search.
    pub fn with_search(mut self, enabled: bool) -> Self {
        self.search_enabled = enabled;
        self
    }

    /// Sets the export worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}
