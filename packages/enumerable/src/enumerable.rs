//! The enumerable operation set.
//!
//! [`Enumerable`] needs two things from an implementor: a view of its
//! ordered items and a way to build a new instance from items. Every other
//! operation is provided on top of those and returns a new instance; none
//! mutates in place.

use std::cmp::Ordering;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use nestkit_value::{data_get, Collection, Error, IntoPath, Key, Value};

use crate::predicate::{Criterion, Operator, Predicate, Retriever};

/// Operations over an ordered key→value container.
///
/// Keys are preserved by every operation that keeps a subset of the items
/// (`filter`, `reject`, `partition`, `slice`, `sort_by`, ...). Operations
/// that build new sequences (`collapse`, `flat_map`) re-index from `0`.
pub trait Enumerable: Sized {
    /// The items, in iteration order.
    fn items(&self) -> &IndexMap<Key, Value>;

    /// Build a new instance holding `items`.
    fn from_items(items: IndexMap<Key, Value>) -> Self;

    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Visit every item until the callback breaks.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    /// use nestkit_enumerable::Enumerable;
    /// use nestkit_value::{Collection, Value};
    ///
    /// let c = Collection::range(1, 10);
    /// let mut seen = Vec::new();
    /// c.each(|v, _| {
    ///     seen.push(v.clone());
    ///     if seen.len() == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(seen.len(), 3);
    /// ```
    fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&Value, &Key) -> ControlFlow<()>,
    {
        for (key, value) in self.items() {
            if f(value, key).is_break() {
                break;
            }
        }
        self
    }

    /// Visit every item as a spread chunk: the item's values followed by
    /// its key.
    fn each_spread<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&[Value]) -> ControlFlow<()>,
    {
        self.each(|value, key| f(&spread(value, key)))
    }

    fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> Value,
    {
        Self::from_items(
            self.items()
                .iter()
                .map(|(k, v)| (k.clone(), f(v, k)))
                .collect(),
        )
    }

    /// Map every item as a spread chunk: the item's values followed by its
    /// key.
    fn map_spread<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[Value]) -> Value,
    {
        self.map(|value, key| f(&spread(value, key)))
    }

    /// Run a dictionary map: the callback returns one `(key, value)` pair
    /// per item and values sharing a key are gathered into an array.
    fn map_to_dictionary<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> (Key, Value),
    {
        let mut dictionary: IndexMap<Key, Vec<Value>> = IndexMap::new();
        for (key, value) in self.items() {
            let (group, mapped) = f(value, key);
            dictionary.entry(group).or_default().push(mapped);
        }
        Self::from_items(
            dictionary
                .into_iter()
                .map(|(k, values)| (k, Value::Array(values)))
                .collect(),
        )
    }

    /// Like [`Enumerable::map_to_dictionary`], with each group as a
    /// collection.
    fn map_to_groups<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> (Key, Value),
    {
        self.map_to_dictionary(f)
            .map(|group, _| Value::Collection(Collection::wrap(group.clone())))
    }

    /// Map, then flatten the results by one level.
    fn flat_map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> Value,
    {
        self.map(f).collapse()
    }

    /// Flatten arrays, maps and collections by one level, re-indexed.
    /// Scalar items are dropped.
    fn collapse(&self) -> Self {
        let mut values = Vec::new();
        for value in self.items().values() {
            match value {
                Value::Array(items) => values.extend(items.iter().cloned()),
                Value::Map(map) => values.extend(map.values().cloned()),
                Value::Collection(collection) => values.extend(collection.values()),
                _ => {}
            }
        }
        Self::from_items(indexed(values))
    }

    fn filter<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::from_items(
            self.items()
                .iter()
                .filter(|&(k, v)| f(v, k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Keep only truthy items.
    fn filter_truthy(&self) -> Self {
        self.filter(|value, _| value.is_truthy())
    }

    fn reject<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.filter(|value, key| !f(value, key))
    }

    /// Drop the items strictly equal to `value`.
    fn reject_value(&self, value: &Value) -> Self {
        self.filter(|item, _| item != value)
    }

    /// Fold the items into a single result. An empty container returns
    /// `initial` unchanged.
    fn reduce<T, F>(&self, initial: T, mut f: F) -> T
    where
        F: FnMut(T, &Value, &Key) -> T,
    {
        let mut result = initial;
        for (key, value) in self.items() {
            result = f(result, value, key);
        }
        result
    }

    /// Fold with several accumulators.
    ///
    /// The callback receives the current accumulators, the item and its
    /// key, and must return an array with as many elements as it was
    /// given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the callback returns anything
    /// else.
    fn reduce_spread<F>(&self, initial: Vec<Value>, mut f: F) -> Result<Vec<Value>, Error>
    where
        F: FnMut(&[Value], &Value, &Key) -> Value,
    {
        let mut result = initial;
        for (key, value) in self.items() {
            result = match f(&result, value, key) {
                Value::Array(next) if next.len() == result.len() => next,
                Value::Array(next) => {
                    return Err(Error::type_mismatch(format!(
                        "reduce_spread expects reducer to return {} values, but got {}",
                        result.len(),
                        next.len()
                    )))
                }
                other => {
                    return Err(Error::type_mismatch(format!(
                        "reduce_spread expects reducer to return an array, but got a '{}' instead",
                        other.type_name()
                    )))
                }
            };
        }
        Ok(result)
    }

    /// Split into the items that pass and the items that fail, keys
    /// preserved on both sides.
    fn partition<F>(&self, mut f: F) -> (Self, Self)
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        let mut passed = IndexMap::new();
        let mut failed = IndexMap::new();
        for (key, value) in self.items() {
            if f(value, key) {
                passed.insert(key.clone(), value.clone());
            } else {
                failed.insert(key.clone(), value.clone());
            }
        }
        (Self::from_items(passed), Self::from_items(failed))
    }

    /// Partition on a where-clause. Without operator and value the
    /// retrieved value's truthiness decides.
    fn partition_where(
        &self,
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> (Self, Self) {
        let predicate = clause(criterion, operator, value);
        self.partition(|v, k| predicate.test(v, k))
    }

    /// Drop repeated items, keeping the first occurrence. Items are
    /// compared strictly.
    fn unique(&self) -> Self {
        self.unique_by(Retriever::Identity)
    }

    /// Drop items whose retrieved identity was already seen, keeping the
    /// first occurrence.
    fn unique_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Self {
        let mut retriever = retriever.into();
        let mut seen: Vec<Value> = Vec::new();
        self.reject(|value, key| {
            let id = retriever.retrieve(value, key);
            if seen.contains(&id) {
                return true;
            }
            seen.push(id);
            false
        })
    }

    fn every<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.items().iter().all(|(k, v)| f(v, k))
    }

    /// `every` on a where-clause. Without operator and value the retrieved
    /// value's truthiness decides.
    fn every_where(
        &self,
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> bool {
        let predicate = clause(criterion, operator, value);
        self.every(|v, k| predicate.test(v, k))
    }

    fn contains<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.items().iter().any(|(k, v)| f(v, k))
    }

    /// Whether an item loosely equals `value`.
    fn contains_value(&self, value: &Value) -> bool {
        self.items().values().any(|item| item.loose_eq(value))
    }

    /// Whether an item strictly equals `value`.
    fn contains_strict(&self, value: &Value) -> bool {
        self.items().values().any(|item| item == value)
    }

    fn contains_where(
        &self,
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> bool {
        let predicate = Predicate::from_operator(criterion, operator, value);
        self.contains(|v, k| predicate.test(v, k))
    }

    /// Alias of [`Enumerable::contains`].
    fn some<F>(&self, f: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.contains(f)
    }

    fn doesnt_contain<F>(&self, f: F) -> bool
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        !self.contains(f)
    }

    /// The first item passing the test.
    fn first<F>(&self, mut f: F) -> Option<Value>
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.items()
            .iter()
            .find(|&(k, v)| f(v, k))
            .map(|(_, v)| v.clone())
    }

    fn first_where(
        &self,
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> Option<Value> {
        let predicate = Predicate::from_operator(criterion, operator, value);
        self.first(|v, k| predicate.test(v, k))
    }

    /// The value at `path` of the first item where that value is exactly
    /// `true`, the same match as `first_where(path, None, None)`.
    fn value<P: IntoPath>(&self, path: P, default: Value) -> Value {
        let path = path.into_path();
        let predicate = Predicate::where_true(Criterion::Path(path.clone()));
        match self.first(|v, k| predicate.test(v, k)) {
            Some(item) => data_get(&item, path, default),
            None => default,
        }
    }

    /// One page of `per_page` items. Page numbers below `1` never produce
    /// a negative offset.
    fn for_page(&self, page: i64, per_page: i64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page).max(0);
        self.slice(offset, Some(usize::try_from(per_page).unwrap_or(0)))
    }

    /// A window of the items, keys preserved. A negative `offset` counts
    /// from the end.
    fn slice(&self, offset: i64, len: Option<usize>) -> Self {
        let total = self.len();
        let start = if offset < 0 {
            total.saturating_sub(usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            usize::try_from(offset).unwrap_or(usize::MAX).min(total)
        };
        Self::from_items(
            self.items()
                .iter()
                .skip(start)
                .take(len.unwrap_or(total))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Group items by a retrieved key. Groups are collections, re-indexed
    /// from `0`, in encounter order. A retrieved array puts the item in
    /// every group it names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when a retrieved value cannot be a
    /// key.
    fn group_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Result<Self, Error> {
        let mut retriever = retriever.into();
        let mut groups: IndexMap<Key, Vec<Value>> = IndexMap::new();
        for (key, value) in self.items() {
            let group = retriever.retrieve(value, key);
            let group_keys = match &group {
                Value::Array(names) => names.iter().map(Key::from_value).collect::<Result<Vec<_>, _>>()?,
                single => vec![Key::from_value(single)?],
            };
            for group_key in group_keys {
                groups.entry(group_key).or_default().push(value.clone());
            }
        }
        Ok(Self::from_items(
            groups
                .into_iter()
                .map(|(k, values)| (k, Value::Collection(Collection::from(values))))
                .collect(),
        ))
    }

    /// Re-key items by a retrieved key. Later items win.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when a retrieved value cannot be a
    /// key.
    fn key_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Result<Self, Error> {
        let mut retriever = retriever.into();
        let mut keyed = IndexMap::new();
        for (key, value) in self.items() {
            let new_key = Key::from_value(&retriever.retrieve(value, key))?;
            keyed.insert(new_key, value.clone());
        }
        Ok(Self::from_items(keyed))
    }

    /// Stable ascending sort on a retrieved value, keys preserved.
    /// Incomparable pairs keep their relative order.
    fn sort_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Self {
        sorted(self, retriever.into(), false)
    }

    fn sort_by_desc<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Self {
        sorted(self, retriever.into(), true)
    }

    /// Skip items until the test passes, keeping the rest.
    fn skip_until<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.skip_while(|value, key| !f(value, key))
    }

    fn skip_while<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::from_items(
            self.items()
                .iter()
                .skip_while(|&(k, v)| f(v, k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Take items until the test passes.
    fn take_until<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        self.take_while(|value, key| !f(value, key))
    }

    fn take_while<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> bool,
    {
        Self::from_items(
            self.items()
                .iter()
                .take_while(|&(k, v)| f(v, k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Pass the whole container to `f`.
    fn pipe<T, F>(self, f: F) -> T
    where
        F: FnOnce(Self) -> T,
    {
        f(self)
    }

    /// Thread the container through each transform in order.
    fn pipe_through<I>(self, transforms: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn FnOnce(Self) -> Self>>,
    {
        transforms
            .into_iter()
            .fold(self, |carry, transform| transform(carry))
    }

    /// Run a side effect and return the container unchanged.
    fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&Self),
    {
        f(&self);
        self
    }

    /// Apply `f` when `condition` holds.
    fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Apply `f` unless `condition` holds.
    fn unless<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.when(!condition, f)
    }

    fn when_empty<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let empty = self.is_empty();
        self.when(empty, f)
    }

    fn when_not_empty<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let not_empty = self.is_not_empty();
        self.when(not_empty, f)
    }

    fn unless_empty<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.when_not_empty(f)
    }

    fn unless_not_empty<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.when_empty(f)
    }
}

impl Enumerable for Collection {
    fn items(&self) -> &IndexMap<Key, Value> {
        self.all()
    }

    fn from_items(items: IndexMap<Key, Value>) -> Self {
        Collection::from(items)
    }
}

/// Where-clause with the truthiness default of `every` and `partition`.
fn clause(
    criterion: impl Into<Criterion>,
    operator: Option<Operator>,
    value: Option<Value>,
) -> Predicate {
    if operator.is_none() && value.is_none() {
        Predicate::truthy(criterion)
    } else {
        Predicate::from_operator(criterion, operator, value)
    }
}

fn spread(value: &Value, key: &Key) -> Vec<Value> {
    let mut chunk = value.iterable_values().unwrap_or_else(|| vec![value.clone()]);
    chunk.push(key.to_value());
    chunk
}

fn indexed(values: Vec<Value>) -> IndexMap<Key, Value> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (Key::from(i), v))
        .collect()
}

fn sorted<E: Enumerable>(enumerable: &E, mut retriever: Retriever<'_>, descending: bool) -> E {
    let mut entries: Vec<(Value, Key, Value)> = enumerable
        .items()
        .iter()
        .map(|(k, v)| (retriever.retrieve(v, k), k.clone(), v.clone()))
        .collect();
    entries.sort_by(|(a, _, _), (b, _, _)| {
        let ordering = a.compare(b).unwrap_or(Ordering::Equal);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    E::from_items(entries.into_iter().map(|(_, k, v)| (k, v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ints(values: &[i64]) -> Collection {
        values.iter().copied().map(Value::from).collect()
    }

    fn collection(json: serde_json::Value) -> Collection {
        Collection::from(Value::from(json))
    }

    #[test]
    fn filter_keeps_order_and_keys() {
        let c = ints(&[1, 2, 3, 4, 5]);
        let even = c.filter(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(even.values(), vec![Value::from(2), Value::from(4)]);
        assert_eq!(even.keys(), vec![Key::Index(1), Key::Index(3)]);
    }

    #[test]
    fn reject_is_inverse_of_filter() {
        let c = ints(&[1, 2, 3]);
        let odd = c.reject(|v, _| v.as_i64() == Some(2));
        assert_eq!(odd.values(), vec![Value::from(1), Value::from(3)]);
        assert_eq!(c.reject_value(&Value::from(1)).len(), 2);
        assert_eq!(c.reject_value(&Value::from("1")).len(), 3);
    }

    #[test]
    fn map_preserves_keys() {
        let c = collection(json!({"a": 1, "b": 2}));
        let doubled = c.map(|v, _| Value::from(v.as_i64().unwrap_or(0) * 2));
        assert_eq!(doubled, collection(json!({"a": 2, "b": 4})));
    }

    #[test]
    fn each_stops_on_break() {
        let c = ints(&[1, 2, 3, 4]);
        let mut visited = Vec::new();
        c.each(|v, _| {
            visited.push(v.clone());
            if v.as_i64() == Some(2) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn spread_chunks_end_with_key() {
        let c = collection(json!([["a", 1], ["b", 2]]));
        let mapped = c.map_spread(|chunk| Value::from(chunk.len()));
        assert_eq!(mapped.values(), vec![Value::from(3), Value::from(3)]);

        let mut keys = Vec::new();
        c.each_spread(|chunk| {
            keys.push(chunk[2].clone());
            ControlFlow::Continue(())
        });
        assert_eq!(keys, vec![Value::from(0), Value::from(1)]);
    }

    #[test]
    fn reduce_sums_and_returns_initial_when_empty() {
        let c = ints(&[1, 2, 3, 4]);
        let total = c.reduce(0, |acc, v, _| acc + v.as_i64().unwrap_or(0));
        assert_eq!(total, 10);
        assert_eq!(Collection::new().reduce(7, |acc, _, _| acc + 1), 7);
    }

    #[test]
    fn reduce_spread_threads_accumulators() {
        let c = ints(&[1, 2, 3]);
        let result = c
            .reduce_spread(vec![Value::from(0), Value::from(1)], |acc, v, _| {
                let n = v.as_i64().unwrap_or(0);
                Value::from(vec![
                    acc[0].as_i64().unwrap_or(0) + n,
                    acc[1].as_i64().unwrap_or(0) * n,
                ])
            })
            .unwrap();
        assert_eq!(result, vec![Value::from(6), Value::from(6)]);
    }

    #[test]
    fn reduce_spread_rejects_non_arrays() {
        let c = ints(&[1]);
        let err = c.reduce_spread(vec![Value::Null], |_, _, _| Value::from(1)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        let err = c
            .reduce_spread(vec![Value::Null], |_, _, _| Value::from(vec![1, 2]))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn partition_preserves_keys() {
        let c = ints(&[1, 2, 3, 4]);
        let (even, odd) = c.partition(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(even.keys(), vec![Key::Index(1), Key::Index(3)]);
        assert_eq!(odd.keys(), vec![Key::Index(0), Key::Index(2)]);

        let mut all: Vec<Key> = even.keys().into_iter().chain(odd.keys()).collect();
        all.sort();
        assert_eq!(all, c.keys());
    }

    #[test]
    fn partition_where_defaults_to_truthiness() {
        let c = collection(json!([{"active": 1}, {"active": 0}, {}]));
        let (active, inactive) = c.partition_where("active", None, None);
        assert_eq!(active.len(), 1);
        assert_eq!(inactive.len(), 2);
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let c = ints(&[1, 2, 1, 3, 2]);
        let unique = c.unique();
        assert_eq!(unique.values(), vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(unique.keys(), vec![Key::Index(0), Key::Index(1), Key::Index(3)]);
    }

    #[test]
    fn unique_is_strict() {
        let c: Collection = vec![Value::from(1), Value::from("1"), Value::from(1.0)].into();
        assert_eq!(c.unique().len(), 3);
    }

    #[test]
    fn unique_by_path() {
        let c = collection(json!([
            {"name": "a", "team": "x"},
            {"name": "b", "team": "y"},
            {"name": "c", "team": "x"}
        ]));
        let names: Vec<Value> = c.unique_by("team").map(|v, _| v.property("name")).values();
        assert_eq!(names, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn every_and_contains() {
        let c = ints(&[2, 4, 6]);
        assert!(c.every(|v, _| v.as_i64().is_some_and(|n| n % 2 == 0)));
        assert!(c.contains(|v, _| v.as_i64() == Some(4)));
        assert!(c.some(|v, _| v.as_i64() == Some(6)));
        assert!(c.doesnt_contain(|v, _| v.as_i64() == Some(5)));
        assert!(c.contains_value(&Value::from("4")));
        assert!(!c.contains_strict(&Value::from("4")));
        assert!(c.contains_strict(&Value::from(4)));
        assert!(Collection::new().every(|_, _| false));
    }

    #[test]
    fn every_where_and_contains_where() {
        let c = collection(json!([{"age": 20}, {"age": 30}]));
        assert!(c.every_where("age", Some(Operator::GreaterThan), Some(Value::from(18))));
        assert!(c.every_where("age", None, None));
        assert!(c.contains_where("age", None, Some(Value::from(30))));
        assert!(!c.contains_where("age", None, Some(Value::from("30"))));
    }

    #[test]
    fn first_and_first_where() {
        let c = collection(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(
            c.first_where("id", Some(Operator::GreaterThan), Some(Value::from(1))),
            Some(Value::from(json!({"id": 2})))
        );
        assert_eq!(c.first(|_, _| false), None);
    }

    #[test]
    fn value_matches_first_where() {
        let c = collection(json!([
            {"active": 1, "id": "a"},
            {"active": "yes", "id": "b"},
            {"active": true, "id": "c"}
        ]));
        assert_eq!(c.value("active", Value::Null), Value::Bool(true));
        assert_eq!(
            c.first_where("active", None, None).map(|item| item.property("id")),
            Some(Value::from("c"))
        );

        let names = collection(json!([{"name": "Taylor"}]));
        assert_eq!(names.value("name", Value::from("d")), Value::from("d"));
        assert_eq!(names.value("missing", Value::from("d")), Value::from("d"));

        let flags: Collection = vec![Value::from(1), Value::Bool(true)].into();
        assert_eq!(flags.value(None::<&str>, Value::Null), Value::Bool(true));
    }

    #[test]
    fn for_page_slices() {
        let c = Collection::range(1, 10);
        assert_eq!(c.for_page(2, 3).values(), ints(&[4, 5, 6]).values());
        assert_eq!(c.for_page(1, 3).values(), ints(&[1, 2, 3]).values());
        assert_eq!(c.for_page(0, 3).values(), ints(&[1, 2, 3]).values());
        assert_eq!(c.for_page(-4, 3).values(), ints(&[1, 2, 3]).values());
        assert!(c.for_page(5, 3).is_empty());
    }

    #[test]
    fn slice_preserves_keys() {
        let c = ints(&[1, 2, 3, 4, 5]);
        let s = c.slice(1, Some(2));
        assert_eq!(s.keys(), vec![Key::Index(1), Key::Index(2)]);
        assert_eq!(c.slice(-2, None).values(), vec![Value::from(4), Value::from(5)]);
        assert!(c.slice(10, None).is_empty());
    }

    #[test]
    fn collapse_one_level() {
        let c: Collection = vec![
            Value::from(vec![1, 2]),
            Value::from(3),
            Value::Collection(ints(&[4])),
        ]
        .into();
        assert_eq!(c.collapse(), ints(&[1, 2, 4]));
    }

    #[test]
    fn flat_map_collapses_one_level() {
        let c = collection(json!([{"tags": ["a", "b"]}, {"tags": [["c"]]}]));
        let tags = c.flat_map(|v, _| v.property("tags"));
        assert_eq!(tags, collection(json!(["a", "b", ["c"]])));
    }

    #[test]
    fn map_to_groups_accumulates() {
        let c = collection(json!([
            {"name": "a", "dept": "x"},
            {"name": "b", "dept": "y"},
            {"name": "c", "dept": "x"}
        ]));
        let groups = c.map_to_groups(|v, _| {
            let dept = Key::from_value(&v.property("dept")).unwrap_or(Key::Index(0));
            (dept, v.property("name"))
        });
        assert_eq!(groups.keys(), vec![Key::from("x"), Key::from("y")]);
        assert_eq!(
            groups.get(&Key::from("x")),
            Some(&Value::Collection(collection(json!(["a", "c"]))))
        );

        let dictionary = c.map_to_dictionary(|v, _| (Key::Index(0), v.property("name")));
        assert_eq!(dictionary.get(&Key::Index(0)), Some(&Value::from(vec!["a", "b", "c"])));
    }

    #[test]
    fn group_by_and_key_by() {
        let c = collection(json!([
            {"id": 10, "role": "admin"},
            {"id": 11, "role": "user"},
            {"id": 12, "role": "admin"}
        ]));
        let groups = c.group_by("role").unwrap();
        assert_eq!(groups.keys(), vec![Key::from("admin"), Key::from("user")]);
        assert_eq!(groups.get(&Key::from("admin")).and_then(Value::as_collection).map(Collection::len), Some(2));

        let keyed = c.key_by("id").unwrap();
        assert_eq!(keyed.keys(), vec![Key::Index(10), Key::Index(11), Key::Index(12)]);

        let err = c.key_by(Retriever::callback(|_, _| Value::array())).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn group_by_array_keys() {
        let c = collection(json!([{"tags": ["a", "b"]}, {"tags": ["b"]}]));
        let groups = c.group_by("tags").unwrap();
        assert_eq!(groups.keys(), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(groups.get(&Key::from("b")).and_then(Value::as_collection).map(Collection::len), Some(2));
    }

    #[test]
    fn sort_by_is_stable_and_keeps_keys() {
        let c = collection(json!([
            {"n": 3, "id": "a"},
            {"n": 1, "id": "b"},
            {"n": 3, "id": "c"}
        ]));
        let sorted = c.sort_by("n");
        assert_eq!(sorted.keys(), vec![Key::Index(1), Key::Index(0), Key::Index(2)]);
        let desc = c.sort_by_desc("n");
        assert_eq!(desc.keys(), vec![Key::Index(0), Key::Index(2), Key::Index(1)]);
    }

    #[test]
    fn skip_and_take() {
        let c = ints(&[1, 2, 3, 4, 1]);
        let lt3 = |v: &Value, _: &Key| v.as_i64().is_some_and(|n| n < 3);
        assert_eq!(c.skip_while(lt3).values(), ints(&[3, 4, 1]).values());
        assert_eq!(c.take_while(lt3).values(), ints(&[1, 2]).values());
        let is4 = |v: &Value, _: &Key| v.as_i64() == Some(4);
        assert_eq!(c.skip_until(is4).values(), ints(&[4, 1]).values());
        assert_eq!(c.take_until(is4).values(), ints(&[1, 2, 3]).values());
    }

    #[test]
    fn pipe_tap_and_conditionals() {
        let c = ints(&[1, 2, 3]);
        assert_eq!(c.clone().pipe(|c| c.len()), 3);

        let mut tapped = 0;
        let same = c.clone().tap(|c| tapped = c.len());
        assert_eq!(tapped, 3);
        assert_eq!(same, c);

        let transforms: Vec<Box<dyn FnOnce(Collection) -> Collection>> = vec![
            Box::new(|c| c.map(|v, _| Value::from(v.as_i64().unwrap_or(0) + 1))),
            Box::new(|c| c.filter(|v, _| v.as_i64() != Some(3))),
        ];
        assert_eq!(c.clone().pipe_through(transforms).values(), ints(&[2, 4]).values());

        let add_zero = |mut c: Collection| {
            c.push(Value::from(0));
            c
        };
        assert_eq!(c.clone().when(true, add_zero).len(), 4);
        assert_eq!(c.clone().unless(true, add_zero).len(), 3);
        assert_eq!(Collection::new().when_empty(add_zero).len(), 1);
        assert_eq!(c.clone().when_not_empty(add_zero).len(), 4);
        assert_eq!(c.clone().unless_empty(add_zero).len(), 4);
        assert_eq!(c.unless_not_empty(add_zero).len(), 3);
    }

    #[test]
    fn filter_truthy_and_collapse() {
        let c: Collection = vec![Value::Null, Value::from(0), Value::from("a"), Value::from(vec![1])].into();
        assert_eq!(c.filter_truthy().len(), 2);
        assert_eq!(Enumerable::collapse(&c).values(), vec![Value::from(1)]);
    }
}
