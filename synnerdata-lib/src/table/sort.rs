//! Single-key sorting with type-directed comparison.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::schema::Schema;
use crate::error::TableError;
use crate::model::Row;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// The active sort key, if any.
///
/// # Example
///
/// ```
/// use synnerdata_lib::table::{Direction, SortState};
///
/// let mut sort = SortState::default();
/// sort.toggle("name");
/// assert_eq!(sort.direction, Direction::Asc);
/// sort.toggle("name");
/// assert_eq!(sort.direction, Direction::Desc);
/// sort.toggle("status");
/// assert_eq!(sort.direction, Direction::Asc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: Direction,
}

impl SortState {
    /// Ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Direction::Asc,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: Direction::Desc,
        }
    }

    /// Header-click behavior: the same column flips, a new column starts ascending.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.flip();
        } else {
            self.column = Some(column.to_string());
            self.direction = Direction::Asc;
        }
    }

    /// Back to identity order.
    pub fn clear(&mut self) {
        self.column = None;
        self.direction = Direction::Asc;
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }

    /// Checks that the sort column exists and is sortable.
    pub fn validate(&self, schema: &Schema) -> Result<(), TableError> {
        if let Some(key) = &self.column {
            let column = schema.require(key)?;
            if !column.sortable {
                return Err(TableError::NotSortable(key.clone()));
            }
        }
        Ok(())
    }
}

/// Sorts rows in place by the active column. Stable; no sort leaves the order untouched.
///
/// Missing and null values go last in either direction. A sort column that
/// is not in the schema leaves the order as is.
pub fn apply_sort(rows: &mut Vec<&Row>, state: &SortState, schema: &Schema) {
    let Some(column) = state.column.as_deref().and_then(|key| schema.column(key)) else {
        return;
    };

    let mut keyed: Vec<(Option<SortKey>, &Row)> = rows
        .drain(..)
        .map(|row| (schema.value(row, column).and_then(SortKey::new), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match state.direction {
            Direction::Asc => a.cmp(b),
            Direction::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

/// Ascending comparison of two raw values.
///
/// Nulls compare after everything else.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (SortKey::new(a.clone()), SortKey::new(b.clone())) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Folds text for pt-BR ordering: strips accents and lowercases.
///
/// `"Álvaro"` sorts next to `"alvaro"`, ahead of `"Bruno"`.
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

// Variant order is the rank between kinds: numbers, then dates, then
// booleans, then text.
#[derive(Debug)]
enum SortKey {
    Number(f64),
    Date(NaiveDateTime),
    Bool(bool),
    Text { folded: String, raw: String },
}

impl SortKey {
    fn new(value: Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        if let Some(n) = value.as_f64() {
            return Some(SortKey::Number(n));
        }
        if let Some(dt) = value.as_datetime() {
            return Some(SortKey::Date(dt));
        }
        if let Value::Bool(b) = value {
            return Some(SortKey::Bool(b));
        }
        let raw = value.to_text();
        Some(SortKey::Text {
            folded: collation_key(&raw),
            raw,
        })
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Bool(_) => 2,
            SortKey::Text { .. } => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (
                SortKey::Text { folded: fa, raw: ra },
                SortKey::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}
