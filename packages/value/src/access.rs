//! Dotted-path access over nested values.
//!
//! `data_get`, `data_set` and `data_forget` walk a [`Path`] through arrays,
//! maps, collections and objects alike. At each literal segment keyed
//! access is tried first, then object fields.

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::{Error, IntoPath, Key, Segment, Value};

/// Read the value at `path`, or `default` when any segment is missing.
///
/// # Example
///
/// ```rust
/// use nestkit_value::{data_get, Value};
///
/// let data: Value = serde_json::json!({"a": {"x": 1}, "b": {"x": 2}}).into();
/// assert_eq!(data_get(&data, "*.x", Value::Null), Value::from(vec![1, 2]));
/// assert_eq!(data_get(&data, "a.y", Value::from("none")), Value::from("none"));
/// ```
pub fn data_get<P: IntoPath>(target: &Value, path: P, default: Value) -> Value {
    data_get_or_else(target, path, || default)
}

/// Like [`data_get`], evaluating the default only on a miss.
pub fn data_get_or_else<P, F>(target: &Value, path: P, default: F) -> Value
where
    P: IntoPath,
    F: FnOnce() -> Value,
{
    let Some(path) = path.into_path() else {
        return target.clone();
    };
    match resolve(Cow::Borrowed(target), &path.segments) {
        Some(found) => found.into_owned(),
        None => default(),
    }
}

/// Whether every segment of `path` resolves.
pub fn data_has<P: IntoPath>(target: &Value, path: P) -> bool {
    match path.into_path() {
        Some(path) => resolve(Cow::Borrowed(target), &path.segments).is_some(),
        None => true,
    }
}

/// Write `value` at `path`, creating intermediate maps as needed.
///
/// A `*` segment assigns into every existing child and never creates new
/// ones. Scalar and null targets along the way are replaced by maps.
///
/// # Errors
///
/// Returns an error for the null path, when `*` meets an object without
/// keyed access, or when an object refuses a field write.
pub fn data_set<P: IntoPath>(target: &mut Value, path: P, value: Value) -> Result<(), Error> {
    data_set_with(target, path, value, true)
}

/// Write `value` at `path` only where nothing is set yet.
pub fn data_fill<P: IntoPath>(target: &mut Value, path: P, value: Value) -> Result<(), Error> {
    data_set_with(target, path, value, false)
}

/// Write `value` at `path`; with `overwrite == false` existing leaves are
/// left untouched.
pub fn data_set_with<P: IntoPath>(
    target: &mut Value,
    path: P,
    value: Value,
    overwrite: bool,
) -> Result<(), Error> {
    let path = path
        .into_path()
        .ok_or_else(|| Error::invalid_path("cannot set a value at the null path"))?;
    assign(target, &path.segments, &value, overwrite)
}

/// Remove the value at `path`.
///
/// A `*` segment recurses into every child; a trailing `*` removes every
/// child. Missing segments are ignored. Removing an element from the middle
/// of an array turns it into a map so the remaining elements keep their
/// indices.
pub fn data_forget<P: IntoPath>(target: &mut Value, path: P) -> Result<(), Error> {
    let path = path
        .into_path()
        .ok_or_else(|| Error::invalid_path("cannot forget the null path"))?;
    forget(target, &path.segments)
}

fn resolve<'a>(target: Cow<'a, Value>, segments: &[Segment]) -> Option<Cow<'a, Value>> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(target);
    };

    let key = match segment {
        Segment::Wildcard => {
            let children = target.iterable_values()?;
            let results: Vec<Value> = children
                .iter()
                .map(|child| {
                    resolve(Cow::Borrowed(child), rest)
                        .map(Cow::into_owned)
                        .unwrap_or_default()
                })
                .collect();
            let results = if rest.iter().any(Segment::is_wildcard) {
                collapse(results)
            } else {
                results
            };
            return Some(Cow::Owned(Value::Array(results)));
        }
        Segment::First => first_key(&target)?,
        Segment::Last => last_key(&target)?,
        Segment::Key(name) => Key::parse(name),
    };

    let child = match target {
        Cow::Borrowed(value) => lookup(value, &key)?,
        Cow::Owned(value) => Cow::Owned(lookup(&value, &key)?.into_owned()),
    };
    resolve(child, rest)
}

fn lookup<'a>(target: &'a Value, key: &Key) -> Option<Cow<'a, Value>> {
    match target {
        Value::Array(items) => index_of(key, items.len()).map(|i| Cow::Borrowed(&items[i])),
        Value::Map(map) => map.get(key).map(Cow::Borrowed),
        Value::Collection(collection) => collection.get(key).map(Cow::Borrowed),
        Value::Object(object) => {
            if object.is_keyed() {
                if let Some(found) = object.offset_get(key) {
                    return Some(Cow::Owned(found));
                }
            }
            object.field(&key.to_string()).map(Cow::Owned)
        }
        _ => None,
    }
}

/// Flatten one level: arrays, maps and collections contribute their
/// values, anything else is dropped.
pub(crate) fn collapse(values: Vec<Value>) -> Vec<Value> {
    let mut flattened = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => flattened.extend(items),
            Value::Map(map) => flattened.extend(map.into_values()),
            Value::Collection(collection) => flattened.extend(collection.values()),
            _ => {}
        }
    }
    flattened
}

fn index_of(key: &Key, len: usize) -> Option<usize> {
    key.as_index()
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < len)
}

fn first_key(target: &Value) -> Option<Key> {
    match target {
        Value::Array(items) if !items.is_empty() => Some(Key::Index(0)),
        Value::Map(map) => map.keys().next().cloned(),
        Value::Collection(collection) => collection.first_key().cloned(),
        Value::Object(object) => match target.iterable_entries() {
            Some(entries) => entries.into_iter().next().map(|(k, _)| k),
            None => object.fields().into_iter().next().map(|(name, _)| Key::parse(&name)),
        },
        _ => None,
    }
}

fn last_key(target: &Value) -> Option<Key> {
    match target {
        Value::Array(items) if !items.is_empty() => Some(Key::from(items.len() - 1)),
        Value::Map(map) => map.keys().last().cloned(),
        Value::Collection(collection) => collection.last_key().cloned(),
        Value::Object(object) => match target.iterable_entries() {
            Some(entries) => entries.into_iter().last().map(|(k, _)| k),
            None => object.fields().into_iter().last().map(|(name, _)| Key::parse(&name)),
        },
        _ => None,
    }
}

fn assign(
    target: &mut Value,
    segments: &[Segment],
    value: &Value,
    overwrite: bool,
) -> Result<(), Error> {
    let Some((segment, rest)) = segments.split_first() else {
        if overwrite || target.is_null() {
            *target = value.clone();
        }
        return Ok(());
    };

    let key = match segment {
        Segment::Wildcard => return assign_each(target, rest, value, overwrite),
        Segment::First => match first_key(target) {
            Some(key) => key,
            None => return Ok(()),
        },
        Segment::Last => match last_key(target) {
            Some(key) => key,
            None => return Ok(()),
        },
        Segment::Key(name) => Key::parse(name),
    };

    if let Value::Array(items) = target {
        let len = items.len();
        match key.as_index().and_then(|i| usize::try_from(i).ok()) {
            Some(i) if i < len => {
                if rest.is_empty() {
                    if overwrite {
                        items[i] = value.clone();
                    }
                    return Ok(());
                }
                return assign(&mut items[i], rest, value, overwrite);
            }
            Some(i) if i == len => {
                items.push(Value::Null);
                if rest.is_empty() {
                    items[i] = value.clone();
                    return Ok(());
                }
                items[i] = Value::map();
                return assign(&mut items[i], rest, value, overwrite);
            }
            _ => {
                log::debug!("promoting array to map to assign key {}", key);
                promote_to_map(target);
            }
        }
    }

    match target {
        Value::Map(map) => assign_entry(map, key, rest, value, overwrite),
        Value::Collection(collection) => {
            assign_entry(collection.items_mut(), key, rest, value, overwrite)
        }
        Value::Object(object) if object.is_keyed() => {
            if rest.is_empty() {
                if overwrite || object.offset_get(&key).is_none() {
                    object.offset_set(&key, value.clone())?;
                }
                return Ok(());
            }
            let mut child = object.offset_get(&key).unwrap_or_else(Value::map);
            assign(&mut child, rest, value, overwrite)?;
            object.offset_set(&key, child)
        }
        Value::Object(object) => {
            let name = key.to_string();
            let current = object.field(&name);
            if rest.is_empty() {
                if overwrite || current.is_none() {
                    object.set_field(&name, value.clone())?;
                }
                return Ok(());
            }
            let mut child = current.unwrap_or_else(Value::map);
            assign(&mut child, rest, value, overwrite)?;
            object.set_field(&name, child)
        }
        scalar => {
            log::debug!("replacing {} with a map to assign key {}", scalar.type_name(), key);
            let mut map = IndexMap::new();
            if rest.is_empty() {
                if overwrite {
                    map.insert(key, value.clone());
                }
            } else {
                let mut child = Value::map();
                assign(&mut child, rest, value, overwrite)?;
                map.insert(key, child);
            }
            *scalar = Value::Map(map);
            Ok(())
        }
    }
}

fn assign_entry(
    map: &mut IndexMap<Key, Value>,
    key: Key,
    rest: &[Segment],
    value: &Value,
    overwrite: bool,
) -> Result<(), Error> {
    if rest.is_empty() {
        if overwrite || !map.contains_key(&key) {
            map.insert(key, value.clone());
        }
        return Ok(());
    }
    let child = map.entry(key).or_insert_with(Value::map);
    assign(child, rest, value, overwrite)
}

fn assign_each(
    target: &mut Value,
    rest: &[Segment],
    value: &Value,
    overwrite: bool,
) -> Result<(), Error> {
    match target {
        Value::Array(items) => each_child(items.iter_mut(), rest, value, overwrite),
        Value::Map(map) => each_child(map.values_mut(), rest, value, overwrite),
        Value::Collection(collection) => {
            each_child(collection.items_mut().values_mut(), rest, value, overwrite)
        }
        Value::Object(object) if object.is_keyed() => {
            for (key, mut child) in object.entries().unwrap_or_default() {
                if rest.is_empty() {
                    if !overwrite {
                        continue;
                    }
                    child = value.clone();
                } else {
                    assign(&mut child, rest, value, overwrite)?;
                }
                object.offset_set(&key, child)?;
            }
            Ok(())
        }
        Value::Object(object) => Err(Error::type_mismatch(format!(
            "cannot fan out over fields of object of class {}",
            object.class_name()
        ))),
        scalar => {
            log::debug!("replacing {} with an empty map for wildcard set", scalar.type_name());
            *scalar = Value::map();
            Ok(())
        }
    }
}

fn each_child<'a>(
    children: impl Iterator<Item = &'a mut Value>,
    rest: &[Segment],
    value: &Value,
    overwrite: bool,
) -> Result<(), Error> {
    for child in children {
        if rest.is_empty() {
            if overwrite {
                *child = value.clone();
            }
        } else {
            assign(child, rest, value, overwrite)?;
        }
    }
    Ok(())
}

fn promote_to_map(target: &mut Value) {
    if let Value::Array(items) = std::mem::take(target) {
        *target = Value::Map(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::from(i), v))
                .collect(),
        );
    }
}

fn forget(target: &mut Value, segments: &[Segment]) -> Result<(), Error> {
    let Some((segment, rest)) = segments.split_first() else {
        *target = Value::Null;
        return Ok(());
    };

    let key = match segment {
        Segment::Wildcard => return forget_each(target, rest),
        Segment::First => match first_key(target) {
            Some(key) => key,
            None => return Ok(()),
        },
        Segment::Last => match last_key(target) {
            Some(key) => key,
            None => return Ok(()),
        },
        Segment::Key(name) => Key::parse(name),
    };

    match target {
        Value::Array(items) => {
            let Some(i) = index_of(&key, items.len()) else {
                return Ok(());
            };
            if !rest.is_empty() {
                return forget(&mut items[i], rest);
            }
            if i + 1 == items.len() {
                items.pop();
                return Ok(());
            }
            // Later elements keep their indices.
            log::debug!("promoting array to map to forget index {}", i);
            promote_to_map(target);
            if let Value::Map(map) = target {
                map.shift_remove(&key);
            }
            Ok(())
        }
        Value::Map(map) => forget_entry(map, &key, rest),
        Value::Collection(collection) => forget_entry(collection.items_mut(), &key, rest),
        Value::Object(object) if object.is_keyed() && object.offset_get(&key).is_some() => {
            if rest.is_empty() {
                return object.offset_unset(&key);
            }
            if let Some(mut child) = object.offset_get(&key) {
                forget(&mut child, rest)?;
                object.offset_set(&key, child)?;
            }
            Ok(())
        }
        Value::Object(object) => {
            let name = key.to_string();
            match object.field(&name) {
                Some(_) if rest.is_empty() => object.unset_field(&name),
                Some(mut child) => {
                    forget(&mut child, rest)?;
                    object.set_field(&name, child)
                }
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn forget_entry(map: &mut IndexMap<Key, Value>, key: &Key, rest: &[Segment]) -> Result<(), Error> {
    if rest.is_empty() {
        map.shift_remove(key);
        return Ok(());
    }
    match map.get_mut(key) {
        Some(child) => forget(child, rest),
        None => Ok(()),
    }
}

fn forget_each(target: &mut Value, rest: &[Segment]) -> Result<(), Error> {
    if rest.is_empty() {
        match target {
            Value::Array(items) => items.clear(),
            Value::Map(map) => map.clear(),
            Value::Collection(collection) => collection.items_mut().clear(),
            Value::Object(object) if object.is_keyed() => {
                for (key, _) in object.entries().unwrap_or_default() {
                    object.offset_unset(&key)?;
                }
            }
            Value::Object(object) => {
                return Err(Error::type_mismatch(format!(
                    "cannot fan out over fields of object of class {}",
                    object.class_name()
                )))
            }
            _ => {}
        }
        return Ok(());
    }

    match target {
        Value::Array(items) => items.iter_mut().try_for_each(|child| forget(child, rest)),
        Value::Map(map) => map.values_mut().try_for_each(|child| forget(child, rest)),
        Value::Collection(collection) => collection
            .items_mut()
            .values_mut()
            .try_for_each(|child| forget(child, rest)),
        Value::Object(object) if object.is_keyed() => {
            for (key, mut child) in object.entries().unwrap_or_default() {
                forget(&mut child, rest)?;
                object.offset_set(&key, child)?;
            }
            Ok(())
        }
        Value::Object(object) => Err(Error::type_mismatch(format!(
            "cannot fan out over fields of object of class {}",
            object.class_name()
        ))),
        _ => Ok(()),
    }
}
