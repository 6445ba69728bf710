//! The Value type - a dynamically typed tree node.
//!
//! A value is a scalar, an ordered sequence, an ordered key→value map, a
//! [`Collection`], or a shared [`ObjectRef`] exposing named fields.

use indexmap::IndexMap;

use crate::{Collection, Error, Key, ObjectRef};

/// A node of nested data that paths and collection operations work over.
///
/// # Design Notes
///
/// - Uses `IndexMap` so insertion order is iteration order
/// - `Array` is a dense sequence addressed by `0..len`; `Map` may mix
///   integer and named keys
/// - `Object` has reference semantics: cloning the value clones the handle,
///   and writes through it are visible to every holder
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Collection(Collection),
    Object(ObjectRef),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(IndexMap::new())
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Objects and collections; arrays and maps are plain data.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Collection(_))
    }

    /// Strings, and objects that can render themselves as text.
    pub fn is_stringable(&self) -> bool {
        match self {
            Value::String(_) | Value::Collection(_) => true,
            Value::Object(object) => object.to_display().is_some(),
            _ => false,
        }
    }

    /// Whether the value supports keyed access (arrays, maps, collections,
    /// keyed objects).
    pub fn is_accessible(&self) -> bool {
        match self {
            Value::Array(_) | Value::Map(_) | Value::Collection(_) => true,
            Value::Object(object) => object.is_keyed(),
            _ => false,
        }
    }

    /// A short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Collection(_) => "collection",
            Value::Object(_) => "object",
        }
    }

    /// Truthiness used by filters and predicates.
    ///
    /// Null, `false`, zero, the empty string, `"0"` and empty arrays or maps
    /// are falsy. Collections and objects are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::Array(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Collection(_) | Value::Object(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Text form of a stringable value.
    pub fn to_display(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Collection(collection) => Some(collection.to_string()),
            Value::Object(object) => object.to_display(),
            _ => None,
        }
    }

    /// The children of an iterable value, in order.
    ///
    /// Returns `None` for scalars and for objects that are not traversable.
    pub fn iterable_values(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.clone()),
            Value::Map(map) => Some(map.values().cloned().collect()),
            Value::Collection(collection) => Some(collection.values()),
            Value::Object(object) => object
                .entries()
                .map(|entries| entries.into_iter().map(|(_, v)| v).collect()),
            _ => None,
        }
    }

    /// The key/value pairs of an iterable value, in order.
    pub fn iterable_entries(&self) -> Option<Vec<(Key, Value)>> {
        match self {
            Value::Array(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Key::from(i), v.clone()))
                    .collect(),
            ),
            Value::Map(map) => Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            Value::Collection(collection) => Some(
                collection
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            Value::Object(object) => object.entries(),
            _ => None,
        }
    }

    /// Invoke a method on an object value.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value, Error> {
        match self {
            Value::Object(object) => object.call(method, args),
            other => Err(Error::type_mismatch(format!(
                "cannot call method {} on {}",
                method,
                other.type_name()
            ))),
        }
    }

    /// Read a property the way a higher-order property access does: keyed
    /// access for arrays, maps and collections, field access for objects.
    /// Missing properties read as null.
    pub fn property(&self, name: &str) -> Value {
        match self {
            Value::Array(items) => Key::parse(name)
                .as_index()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_default(),
            Value::Map(map) => map.get(&Key::parse(name)).cloned().unwrap_or_default(),
            Value::Collection(collection) => collection
                .get(&Key::parse(name))
                .cloned()
                .unwrap_or_default(),
            Value::Object(object) if object.is_keyed() => {
                object.offset_get(&Key::parse(name)).unwrap_or_default()
            }
            Value::Object(object) => object.field(name).unwrap_or_default(),
            _ => Value::Null,
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(map: IndexMap<Key, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::Collection(collection)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::array().is_truthy());
        assert!(!Value::map().is_truthy());

        assert!(Value::from("0.0").is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from(vec![0]).is_truthy());
        assert!(Value::Collection(Collection::new()).is_truthy());
        assert!(Record::new("Empty").into_value().is_truthy());
    }

    #[test]
    fn object_classification() {
        assert!(Value::Collection(Collection::new()).is_object());
        assert!(Record::new("User").into_value().is_object());
        assert!(!Value::map().is_object());
        assert!(!Value::array().is_object());
    }

    #[test]
    fn stringable_classification() {
        assert!(Value::from("x").is_stringable());
        assert!(Value::Collection(Collection::new()).is_stringable());
        assert!(!Record::new("Plain").into_value().is_stringable());
        let named = Record::new("Named").with_display(|_| "named".to_string());
        assert!(named.into_value().is_stringable());
        assert!(!Value::from(1).is_stringable());
    }

    #[test]
    fn iterable_values_of_map_keep_order() {
        let value: Value = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(
            value.iterable_values().unwrap(),
            vec![Value::from(2), Value::from(1)]
        );
        assert!(Value::from(5).iterable_values().is_none());
    }

    #[test]
    fn iterable_entries_of_array_are_indexed() {
        let value = Value::from(vec!["x", "y"]);
        let entries = value.iterable_entries().unwrap();
        assert_eq!(entries[0], (Key::Index(0), Value::from("x")));
        assert_eq!(entries[1], (Key::Index(1), Value::from("y")));
    }

    #[test]
    fn property_reads() {
        let map: Value = vec![("name", "Taylor")].into_iter().collect();
        assert_eq!(map.property("name"), Value::from("Taylor"));
        assert_eq!(map.property("missing"), Value::Null);

        let list = Value::from(vec![10, 20]);
        assert_eq!(list.property("1"), Value::from(20));

        let record = Record::new("User").with_field("age", 30).into_value();
        assert_eq!(record.property("age"), Value::from(30));
        assert_eq!(Value::from(3).property("x"), Value::Null);
    }

    #[test]
    fn call_on_non_object_is_type_mismatch() {
        let err = Value::from(1).call("len", &[]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }
}
