//! Validated column set with accessor and renderer registries

use std::collections::HashMap;
use std::sync::Arc;

use super::column::Accessor;
use super::column::Column;
use super::column::Renderer;
use super::render;
use crate::error::TableError;
use crate::model::Row;
use crate::model::Value;

/// Computes a column value from a whole row.
pub type AccessorFn = Arc<dyn Fn(&Row) -> Option<Value> + Send + Sync>;

/// Produces display text for a cell; receives the row and the resolved value.
pub type RendererFn = Arc<dyn Fn(&Row, Option<&Value>) -> String + Send + Sync>;

/// The columns of one table, checked once at construction.
///
/// A schema guarantees unique keys and that every computed accessor and
/// custom renderer named by a column is registered. After that, resolving
/// and rendering a cell never fails: missing data reads as `None` and
/// renders as an empty string.
///
/// # Example
///
/// ```
/// use synnerdata_lib::model::{Row, Value};
/// use synnerdata_lib::table::{Column, Schema};
///
/// let schema = Schema::builder()
///     .column(Column::new("name", "Nome"))
///     .column(Column::new("fullName", "Nome completo").computed("full_name"))
///     .accessor("full_name", |row: &Row| {
///         let first = row.get("firstName")?.to_text();
///         let last = row.get("lastName")?.to_text();
///         Some(Value::from(format!("{} {}", first, last)))
///     })
///     .build()
///     .unwrap();
///
/// let row = Row::new().set("firstName", "Ana").set("lastName", "Lima");
/// let column = schema.column("fullName").unwrap();
/// assert_eq!(schema.render(&row, column), "Ana Lima");
/// ```
#[derive(Clone)]
pub struct Schema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    accessors: HashMap<String, AccessorFn>,
    renderers: HashMap<String, RendererFn>,
}

impl Schema {
    /// Validates a plain column list (no computed accessors or custom renderers).
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        Self::builder().columns(columns).build()
    }

    /// Creates a new builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Returns every column in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.index.get(key).map(|&i| &self.columns[i])
    }

    /// Looks up a column by key, failing if it does not exist.
    pub fn require(&self, key: &str) -> Result<&Column, TableError> {
        self.column(key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))
    }

    /// Columns that carry data (everything but the actions column).
    pub fn data_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_actions())
    }

    /// Resolves a column's raw value for a row.
    ///
    /// Missing fields, broken paths and accessors returning `None` all give
    /// `None`; the actions column has no value.
    pub fn value(&self, row: &Row, column: &Column) -> Option<Value> {
        if column.is_actions() {
            return None;
        }
        match &column.accessor {
            None => row.resolve(&column.key),
            Some(Accessor::Field(path)) => row.resolve(path),
            Some(Accessor::Computed(name)) => self.accessors.get(name).and_then(|f| f(row)),
        }
    }

    /// Renders a cell to display text.
    pub fn render(&self, row: &Row, column: &Column) -> String {
        let value = self.value(row, column);
        let value = value.as_ref();

        match &column.renderer {
            Renderer::Custom(name) => match self.renderers.get(name) {
                Some(f) => f(row, value),
                None => value.map(Value::to_text).unwrap_or_default(),
            },
            _ if value.is_none_or(Value::is_null) => String::new(),
            Renderer::Text => value.map(Value::to_text).unwrap_or_default(),
            Renderer::Currency => value.map(render::currency_cell).unwrap_or_default(),
            Renderer::Date => value.map(|v| render::date_cell(v, false)).unwrap_or_default(),
            Renderer::DateTime => value.map(|v| render::date_cell(v, true)).unwrap_or_default(),
            Renderer::YesNo => match value {
                Some(Value::Bool(b)) => render::yes_no(*b).to_string(),
                Some(other) => other.to_text(),
                None => String::new(),
            },
            Renderer::Labels(labels) => {
                let text = value.map(Value::to_text).unwrap_or_default();
                labels.get(&text).cloned().unwrap_or(text)
            }
        }
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("columns", &self.columns)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a [`Schema`].
#[derive(Default)]
pub struct SchemaBuilder {
    columns: Vec<Column>,
    accessors: HashMap<String, AccessorFn>,
    renderers: HashMap<String, RendererFn>,
}

impl SchemaBuilder {
    /// Appends a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends several columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Registers a computed accessor under `name`.
    pub fn accessor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row) -> Option<Value> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(f));
        self
    }

    /// Registers a custom renderer under `name`.
    pub fn renderer<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row, Option<&Value>) -> String + Send + Sync + 'static,
    {
        self.renderers.insert(name.into(), Arc::new(f));
        self
    }

    /// Validates the columns and builds the schema.
    pub fn build(self) -> Result<Schema, TableError> {
        let mut index = HashMap::with_capacity(self.columns.len());

        for (i, column) in self.columns.iter().enumerate() {
            if column.key.trim().is_empty() {
                return Err(TableError::EmptyColumnKey);
            }
            if index.insert(column.key.clone(), i).is_some() {
                return Err(TableError::DuplicateColumn(column.key.clone()));
            }
            if let Some(Accessor::Computed(name)) = &column.accessor {
                if !self.accessors.contains_key(name) {
                    return Err(TableError::UnknownAccessor {
                        column: column.key.clone(),
                        accessor: name.clone(),
                    });
                }
            }
            if let Renderer::Custom(name) = &column.renderer {
                if !self.renderers.contains_key(name) {
                    return Err(TableError::UnknownRenderer {
                        column: column.key.clone(),
                        renderer: name.clone(),
                    });
                }
            }
        }

        log::debug!("table schema built with {} columns", self.columns.len());

        Ok(Schema {
            columns: self.columns,
            index,
            accessors: self.accessors,
            renderers: self.renderers,
        })
    }
}
