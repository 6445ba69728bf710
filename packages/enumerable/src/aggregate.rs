//! Numeric aggregates: `sum`, `avg`, `min` and `max`.

use std::cmp::Ordering;

use nestkit_value::{Error, Number, Value};

use crate::predicate::Retriever;
use crate::Enumerable;

/// Aggregates over any [`Enumerable`].
///
/// `sum` and `avg` coerce every retrieved value to a number (null counts as
/// zero for `sum`). `min` and `max` compare with the native ordering and
/// ignore nulls.
pub trait Aggregate: Enumerable {
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for a non-numeric item.
    fn sum(&self) -> Result<Value, Error> {
        self.sum_by(Retriever::Identity)
    }

    fn sum_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Result<Value, Error> {
        let mut retriever = retriever.into();
        let mut total = Number::Integer(0);
        for (key, value) in self.items() {
            total = total.add(retriever.retrieve(value, key).to_number()?);
        }
        Ok(total.into())
    }

    /// Mean of the non-null items; null when there are none.
    fn avg(&self) -> Result<Value, Error> {
        self.avg_by(Retriever::Identity)
    }

    fn avg_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Result<Value, Error> {
        let mut retriever = retriever.into();
        let mut total = Number::Integer(0);
        let mut count: i64 = 0;
        for (key, value) in self.items() {
            let retrieved = retriever.retrieve(value, key);
            if retrieved.is_null() {
                continue;
            }
            total = total.add(retrieved.to_number()?);
            count += 1;
        }
        if count == 0 {
            return Ok(Value::Null);
        }
        Ok(total.div(Number::Integer(count))?.into())
    }

    /// Alias of [`Aggregate::avg`].
    fn average(&self) -> Result<Value, Error> {
        self.avg()
    }

    fn average_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Result<Value, Error> {
        self.avg_by(retriever)
    }

    /// Smallest non-null item; null when there are none.
    fn min(&self) -> Value {
        self.min_by(Retriever::Identity)
    }

    fn min_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Value {
        extreme(self, retriever.into(), Ordering::Less)
    }

    /// Largest non-null item; null when there are none.
    fn max(&self) -> Value {
        self.max_by(Retriever::Identity)
    }

    fn max_by<'a>(&self, retriever: impl Into<Retriever<'a>>) -> Value {
        extreme(self, retriever.into(), Ordering::Greater)
    }
}

impl<T: Enumerable> Aggregate for T {}

fn extreme<E: Enumerable>(
    enumerable: &E,
    mut retriever: Retriever<'_>,
    wanted: Ordering,
) -> Value {
    let mut result = Value::Null;
    for (key, value) in enumerable.items() {
        let retrieved = retriever.retrieve(value, key);
        if retrieved.is_null() {
            continue;
        }
        if result.is_null() || retrieved.compare(&result) == Some(wanted) {
            result = retrieved;
        }
    }
    result
}
