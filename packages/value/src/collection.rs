//! The ordered key→value container.
//!
//! A [`Collection`] preserves insertion order, keeps keys unique, and
//! overwrites in place when a key is re-added. Enumerable operations live
//! in `nestkit-enumerable`; this module holds construction, item access
//! and projection.

use std::fmt;

use indexmap::IndexMap;

use crate::compare::ordered_map_eq;
use crate::escape::{Escape, HtmlEscape};
use crate::{Error, Key, Value};

/// An ordered mapping from [`Key`] to [`Value`].
///
/// # Example
///
/// ```rust
/// use nestkit_value::{Collection, Value};
///
/// let mut c = Collection::from(vec![Value::from(1), Value::from(2)]);
/// c.push(Value::from(3));
/// assert_eq!(c.len(), 3);
/// assert_eq!(c.to_string(), "[1,2,3]");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Collection {
    items: IndexMap<Key, Value>,
    escape_when_casting: bool,
}

impl Collection {
    pub fn new() -> Self {
        Collection::default()
    }

    pub fn empty() -> Self {
        Collection::default()
    }

    pub fn make(items: impl Into<Collection>) -> Self {
        items.into()
    }

    /// Wrap a value: collections pass through, arrays and maps become the
    /// items, null is empty, and anything else becomes a single item.
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Collection(collection) => collection,
            Value::Array(_) | Value::Map(_) => Collection::from(value),
            Value::Null => Collection::new(),
            other => Collection::from(vec![other]),
        }
    }

    /// The plain items of a collection value; other values are returned
    /// unchanged.
    pub fn unwrap(value: Value) -> Value {
        match value {
            Value::Collection(collection) => collection.into_value(),
            other => other,
        }
    }

    /// `n` items produced by `f(1)..=f(n)`, keyed `0..n`.
    pub fn times<F: FnMut(i64) -> Value>(n: i64, mut f: F) -> Self {
        (1..=n.max(0)).map(|i| f(i)).collect()
    }

    /// Integers from `from` to `to` inclusive, stepping down when
    /// `from > to`.
    pub fn range(from: i64, to: i64) -> Self {
        if from <= to {
            (from..=to).map(Value::from).collect()
        } else {
            (to..=from).rev().map(Value::from).collect()
        }
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn add(&mut self, key: impl Into<Key>, value: Value) -> &mut Self {
        self.items.insert(key.into(), value);
        self
    }

    /// Append a value at the next integer key.
    pub fn push(&mut self, value: Value) -> &mut Self {
        let key = self.next_index();
        self.items.insert(key, value);
        self
    }

    /// Remove a key, keeping the order of the rest.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.items.shift_remove(key)
    }

    pub fn has(&self, key: &Key) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn all(&self) -> &IndexMap<Key, Value> {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut IndexMap<Key, Value> {
        &mut self.items
    }

    pub fn into_items(self) -> IndexMap<Key, Value> {
        self.items
    }

    pub fn keys(&self) -> Vec<Key> {
        self.items.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first_key(&self) -> Option<&Key> {
        self.items.keys().next()
    }

    pub fn last_key(&self) -> Option<&Key> {
        self.items.keys().last()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.items.iter()
    }

    /// Whether the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        is_list(&self.items)
    }

    /// The items as a plain value: an `Array` when the keys are `0..n`,
    /// a `Map` otherwise.
    pub fn into_value(self) -> Value {
        if is_list(&self.items) {
            Value::Array(self.items.into_values().collect())
        } else {
            Value::Map(self.items)
        }
    }

    /// Recursively unwrap nested collections and arrayable objects into
    /// plain arrays and maps.
    pub fn to_array(&self) -> Value {
        let items: IndexMap<Key, Value> = self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), plain(v)))
            .collect();
        Collection::from(items).into_value()
    }

    /// The JSON tree of the items, recursing through every JSON-capable
    /// value.
    pub fn json_serialize(&self) -> serde_json::Value {
        crate::convert::items_to_json(&self.items)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_pretty_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Escape the JSON text when the collection is rendered with
    /// `Display`.
    pub fn escape_when_casting_to_string(&mut self, escape: bool) -> &mut Self {
        self.escape_when_casting = escape;
        self
    }

    /// Render as JSON through a caller-chosen escaper.
    pub fn to_string_with(&self, escape: &dyn Escape) -> String {
        escape.escape(&self.json_serialize().to_string())
    }

    fn next_index(&self) -> Key {
        let next = self
            .items
            .keys()
            .filter_map(Key::as_index)
            .max()
            .map_or(0, |max| max.saturating_add(1).max(0));
        Key::Index(next)
    }
}

pub(crate) fn is_list(items: &IndexMap<Key, Value>) -> bool {
    items
        .keys()
        .enumerate()
        .all(|(i, key)| *key == Key::Index(i as i64))
}

fn plain(value: &Value) -> Value {
    match value {
        Value::Collection(collection) => collection.to_array(),
        Value::Object(object) => object.to_array().unwrap_or_else(|| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(plain).collect()),
        Value::Map(map) => Value::Map(map.iter().map(|(k, v)| (k.clone(), plain(v))).collect()),
        other => other.clone(),
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        ordered_map_eq(&self.items, &other.items)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.escape_when_casting {
            write!(f, "{}", self.to_string_with(&HtmlEscape))
        } else {
            write!(f, "{}", self.json_serialize())
        }
    }
}

impl From<Vec<Value>> for Collection {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().collect()
    }
}

impl From<IndexMap<Key, Value>> for Collection {
    fn from(items: IndexMap<Key, Value>) -> Self {
        Collection {
            items,
            escape_when_casting: false,
        }
    }
}

/// Coerce any value to collection items: arrays are indexed, maps keep
/// their keys, objects offer entries or their array form, null is empty
/// and any other scalar becomes a single item.
impl From<Value> for Collection {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Collection::new(),
            Value::Array(items) => items.into(),
            Value::Map(map) => map.into(),
            Value::Collection(collection) => collection,
            Value::Object(object) => {
                if let Some(entries) = object.entries() {
                    return entries.into_iter().collect();
                }
                match object.to_array() {
                    Some(array @ (Value::Array(_) | Value::Map(_))) => array.into(),
                    _ => object
                        .fields()
                        .into_iter()
                        .map(|(name, value)| (Key::parse(&name), value))
                        .collect(),
                }
            }
            scalar => Collection::from(vec![scalar]),
        }
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        iter.into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v))
            .collect()
    }
}

impl FromIterator<(Key, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Collection::from(iter.into_iter().collect::<IndexMap<Key, Value>>())
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
