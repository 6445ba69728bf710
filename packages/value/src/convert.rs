//! Conversion between [`Value`] and JSON.
//!
//! Containers whose keys are exactly `0..n` become JSON arrays; anything
//! else becomes a JSON object with stringified keys. Objects render through
//! their `to_json` capability, then `to_array`, then their fields.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::collection::is_list;
use crate::{Collection, Key, ObjectRef, Value};

impl Value {
    /// The JSON tree for this value. Non-finite floats become null.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json_value).collect())
            }
            Value::Map(map) => items_to_json(map),
            Value::Collection(collection) => items_to_json(collection.all()),
            Value::Object(object) => object_to_json(object),
        }
    }
}

pub(crate) fn items_to_json(items: &IndexMap<Key, Value>) -> serde_json::Value {
    if is_list(items) {
        serde_json::Value::Array(items.values().map(Value::to_json_value).collect())
    } else {
        serde_json::Value::Object(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_json_value()))
                .collect(),
        )
    }
}

fn object_to_json(object: &ObjectRef) -> serde_json::Value {
    if let Some(json) = object.to_json() {
        return json;
    }
    if let Some(array) = object.to_array() {
        return array.to_json_value();
    }
    serde_json::Value::Object(
        object
            .fields()
            .into_iter()
            .map(|(name, value)| (name, value.to_json_value()))
            .collect(),
    )
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(_) => serializer.serialize_unit(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => serialize_items(map, serializer),
            Value::Collection(collection) => collection.serialize(serializer),
            Value::Object(object) => object_to_json(object).serialize(serializer),
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_items(self.all(), serializer)
    }
}

fn serialize_items<S: Serializer>(
    items: &IndexMap<Key, Value>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if is_list(items) {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for value in items.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    } else {
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for (key, value) in items {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::parse(&k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
