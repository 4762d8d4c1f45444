//! Page slicing and page-index bookkeeping.

use crate::error::TableError;
use crate::model::Row;

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Current page position.
///
/// `page_size` is never zero. After [`clamp`](Self::clamp) the index points
/// at an existing page, or 0 when there are no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_index: usize,
    page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    /// Creates a state on the first page.
    pub fn new(page_size: usize) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        Ok(Self {
            page_index: 0,
            page_size,
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves to a page; out-of-range indexes are fixed by the next clamp.
    pub fn set_page(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    /// Changes the page size, keeping the first visible row on screen.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        let first_row = self.page_index.saturating_mul(self.page_size);
        self.page_index = first_row / page_size;
        self.page_size = page_size;
        Ok(())
    }

    /// Pulls the index back onto the last page when the row count shrank.
    pub fn clamp(&mut self, total_rows: usize) {
        let pages = page_count(total_rows, self.page_size);
        self.page_index = self.page_index.min(pages.saturating_sub(1));
    }
}

/// Number of pages for `total_rows`; 0 when there are no rows.
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

/// One page of rows plus navigation flags.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub rows: Vec<&'a Row>,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub can_prev: bool,
    pub can_next: bool,
}

/// Slices one page out of `rows`.
///
/// An index past the end yields an empty page; callers that own the state
/// clamp first.
pub fn paginate<'a>(rows: &[&'a Row], state: &PaginationState) -> PageSlice<'a> {
    let total_rows = rows.len();
    let page_count = page_count(total_rows, state.page_size);
    let start = state.page_index.saturating_mul(state.page_size).min(total_rows);
    let end = start.saturating_add(state.page_size).min(total_rows);

    PageSlice {
        rows: rows[start..end].to_vec(),
        page_index: state.page_index,
        page_size: state.page_size,
        page_count,
        total_rows,
        can_prev: state.page_index > 0,
        can_next: state.page_index < page_count.saturating_sub(1),
    }
}
