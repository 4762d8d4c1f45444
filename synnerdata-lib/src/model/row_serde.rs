//! Serde support for Row.
//!
//! A row is a flat JSON object on the wire:
//! - Serialization writes every field, nulls included, so a row written back
//!   to disk round-trips with the same keys.
//! - Deserialization accepts any JSON object; nested objects and arrays stay
//!   as [`Value::Json`] and are reachable through [`Row::resolve`].

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;

use super::Row;
use super::Value;

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Sorted keys keep exported JSON stable between runs.
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();

        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            map.serialize_entry(key, &self.fields[key])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RowVisitor)
    }
}

struct RowVisitor;

impl<'de> Visitor<'de> for RowVisitor {
    type Value = Row;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object representing a row")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Row, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut row = Row::new();
        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;
            row.fields.insert(key, Value::from(value));
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_simple_fields() {
        let json = r#"{"id": 7, "name": "Cid", "salary": 3200.5, "active": true}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        assert_eq!(row.get_int("id").unwrap(), Some(7));
        assert_eq!(row.get_string("name").unwrap(), Some("Cid"));
        assert_eq!(row.get_float("salary").unwrap(), Some(3200.5));
        assert_eq!(row.get_bool("active").unwrap(), Some(true));
    }

    #[test]
    fn test_serialize_sorted_keys() {
        let row = Row::new().set("name", "Bob").set("id", 1).set("status", "A");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Bob","status":"A"}"#);
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(serde_json::from_str::<Row>("[1, 2]").is_err());
    }
}
