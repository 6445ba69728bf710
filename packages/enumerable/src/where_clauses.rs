//! The `where*` filters.

use nestkit_value::{data_get, Collection, IntoPath, Value};

use crate::predicate::{Criterion, Operator, Predicate};
use crate::Enumerable;

/// Filters built from where-clauses over any [`Enumerable`].
///
/// # Example
///
/// ```rust
/// use nestkit_enumerable::{Operator, Where};
/// use nestkit_value::{Collection, Value};
///
/// let users = Collection::from(Value::from(serde_json::json!([
///     {"name": "Ada", "age": 36},
///     {"name": "Alan", "age": 41},
/// ])));
/// let over_40 = users.where_("age", Some(Operator::GreaterThan), Some(Value::from(40)));
/// assert_eq!(over_40.len(), 1);
/// ```
pub trait Where: Enumerable {
    /// Keep the items matching the clause.
    fn where_(
        &self,
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> Self {
        let predicate = Predicate::from_operator(criterion, operator, value);
        self.filter(|v, k| predicate.test(v, k))
    }

    fn where_null(&self, criterion: impl Into<Criterion>) -> Self {
        self.where_strict(criterion, Value::Null)
    }

    fn where_not_null(&self, criterion: impl Into<Criterion>) -> Self {
        self.where_(criterion, Some(Operator::NotEqual), Some(Value::Null))
    }

    fn where_strict(&self, criterion: impl Into<Criterion>, value: Value) -> Self {
        self.where_(criterion, Some(Operator::Equal), Some(value))
    }

    /// Keep the items whose value at `path` loosely equals one of `values`.
    fn where_in<P: IntoPath>(&self, path: P, values: impl Into<Collection>) -> Self {
        let values = values.into().values();
        let path = path.into_path();
        self.filter(|item, _| {
            let retrieved = data_get(item, path.as_ref(), Value::Null);
            values.iter().any(|v| v.loose_eq(&retrieved))
        })
    }

    fn where_in_strict<P: IntoPath>(&self, path: P, values: impl Into<Collection>) -> Self {
        let values = values.into().values();
        let path = path.into_path();
        self.filter(|item, _| values.contains(&data_get(item, path.as_ref(), Value::Null)))
    }

    fn where_not_in<P: IntoPath>(&self, path: P, values: impl Into<Collection>) -> Self {
        let values = values.into().values();
        let path = path.into_path();
        self.reject(|item, _| {
            let retrieved = data_get(item, path.as_ref(), Value::Null);
            values.iter().any(|v| v.loose_eq(&retrieved))
        })
    }

    fn where_not_in_strict<P: IntoPath>(&self, path: P, values: impl Into<Collection>) -> Self {
        let values = values.into().values();
        let path = path.into_path();
        self.reject(|item, _| values.contains(&data_get(item, path.as_ref(), Value::Null)))
    }

    /// Keep the items whose value at `path` lies between the first and the
    /// last of `bounds`, inclusive.
    fn where_between<P: IntoPath>(&self, path: P, bounds: &[Value]) -> Self {
        let lower = bounds.first().cloned().unwrap_or_default();
        let upper = bounds.last().cloned().unwrap_or_default();
        let path = path.into_path();
        self.where_(
            Criterion::Path(path.clone()),
            Some(Operator::GreaterOrEqual),
            Some(lower),
        )
        .where_(Criterion::Path(path), Some(Operator::LessOrEqual), Some(upper))
    }

    /// Keep the items whose value at `path` is below the first or above
    /// the last of `bounds`.
    fn where_not_between<P: IntoPath>(&self, path: P, bounds: &[Value]) -> Self {
        let lower = bounds.first().cloned().unwrap_or_default();
        let upper = bounds.last().cloned().unwrap_or_default();
        let path = path.into_path();
        self.filter(|item, _| {
            let retrieved = data_get(item, path.as_ref(), Value::Null);
            Operator::LessThan.apply(&retrieved, &lower)
                || Operator::GreaterThan.apply(&retrieved, &upper)
        })
    }

    /// Keep the objects whose class is one of `classes`. Collections have
    /// the class name `Collection`.
    fn where_instance_of(&self, classes: &[&str]) -> Self {
        self.filter(|item, _| match item {
            Value::Object(object) => classes.contains(&object.class_name()),
            Value::Collection(_) => classes.contains(&"Collection"),
            _ => false,
        })
    }
}

impl<T: Enumerable> Where for T {}
