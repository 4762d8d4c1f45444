//! Dynamic table row

use std::collections::HashMap;

use super::Value;
use crate::error::ExportError;
use crate::error::FieldError;

/// One record returned by the Synnerdata API, displayed as a table line.
///
/// Rows hold field values as a `HashMap<String, Value>`. The table engine
/// only ever reads them; the only identity a row has is the
/// application-supplied `id` field.
///
/// # Example
///
/// ```
/// use synnerdata_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", 1)
///     .set("name", "Bob")
///     .set("status", "A");
///
/// assert_eq!(row.id().as_deref(), Some("1"));
/// assert_eq!(row.get_string("name").unwrap(), Some("Bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub(crate) fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Returns the `id` field as text, if present and not null.
    pub fn id(&self) -> Option<String> {
        self.fields
            .get("id")
            .filter(|v| !v.is_blank())
            .map(Value::to_text)
    }

    /// Returns the `status` field, if it is a string.
    pub fn status(&self) -> Option<&str> {
        self.fields.get("status").and_then(Value::as_str)
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Follows a dotted path into nested objects.
    ///
    /// `"department.name"` reads the `name` key of the `department` object.
    /// Array segments are addressed by index (`"phones.0"`). Any missing
    /// segment yields `None`.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        if let Some(value) = self.fields.get(path) {
            return Some(value.clone());
        }

        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current = match self.fields.get(head)? {
            Value::Json(json) => json,
            _ => return None,
        };

        for segment in segments {
            current = match current {
                serde_json::Value::Object(map) => map.get(segment)?,
                serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(Value::from(current.clone()))
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(field, "string", other.type_name())),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a numeric field value as f64 (integers widen).
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| FieldError::type_mismatch(field, "float", value.type_name())),
        }
    }

    // =========================================================================
    // Bulk decoding
    // =========================================================================

    /// Decodes a JSON array of objects into rows.
    ///
    /// Anything other than an array of objects is rejected, which is how
    /// untyped payloads reach the exporter.
    pub fn list_from_json(value: serde_json::Value) -> Result<Vec<Row>, ExportError> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(ExportError::invalid_input(format!(
                    "expected an array of rows, got {}",
                    json_kind(&other)
                )));
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(map) => Ok(Row::from(map)),
                other => Err(ExportError::invalid_input(format!(
                    "row {} is {}, expected an object",
                    index,
                    json_kind(&other)
                ))),
            })
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
