//! Predicates built from `(key, operator, value)` triples.
//!
//! A [`Predicate`] is a shareable `(value, key) -> bool` test. The
//! `where*` family, `first_where`, `every_where` and friends all go through
//! [`Predicate::from_operator`]; a caller-supplied predicate passes through
//! unchanged.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use nestkit_value::{data_get, IntoPath, Key, Path, Value};

/// Comparison operator of a where-clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`, `==` and `===`: strict equality.
    Equal,
    /// `!=`, `<>` and `!==`: strict inequality.
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
}

impl Operator {
    /// Parse an operator symbol. Unknown symbols mean equality.
    pub fn parse(symbol: &str) -> Operator {
        match symbol {
            "!=" | "<>" | "!==" => Operator::NotEqual,
            "<" => Operator::LessThan,
            ">" => Operator::GreaterThan,
            "<=" => Operator::LessOrEqual,
            ">=" => Operator::GreaterOrEqual,
            _ => Operator::Equal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "===",
            Operator::NotEqual => "!==",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
        }
    }

    pub fn is_negation(self) -> bool {
        self == Operator::NotEqual
    }

    /// Evaluates an ordered comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
        }
    }

    /// Compare a retrieved value against the clause value.
    ///
    /// When exactly one side is an object and the two are not both
    /// stringable, only inequality holds.
    pub fn apply(self, retrieved: &Value, value: &Value) -> bool {
        let strings = [retrieved, value]
            .iter()
            .filter(|v| v.is_stringable())
            .count();
        let objects = [retrieved, value].iter().filter(|v| v.is_object()).count();
        if strings < 2 && objects == 1 {
            return self.is_negation();
        }

        match self {
            Operator::Equal => retrieved == value,
            Operator::NotEqual => retrieved != value,
            ordered => retrieved
                .compare(value)
                .is_some_and(|ordering| ordered.eval_ordering(ordering)),
        }
    }
}

impl From<&str> for Operator {
    fn from(symbol: &str) -> Self {
        Operator::parse(symbol)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

type PredicateFn = dyn Fn(&Value, &Key) -> bool + Send + Sync;

/// A reusable `(value, key) -> bool` test.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

/// The first argument of a where-clause: a path into each item, or a
/// ready-made predicate.
#[derive(Clone, Debug)]
pub enum Criterion {
    /// `None` addresses the item itself.
    Path(Option<Path>),
    Predicate(Predicate),
}

impl Predicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Value, &Key) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(test))
    }

    pub fn test(&self, value: &Value, key: &Key) -> bool {
        (self.0)(value, key)
    }

    /// Build a predicate from the where-clause argument forms.
    ///
    /// | operator | value | meaning |
    /// |----------|-------|---------|
    /// | `None` | `None` | retrieved `=== true` |
    /// | `None` | `Some(v)` | retrieved `=== v` |
    /// | `Some(op)` | `v` | retrieved `op v`, a missing value is null |
    ///
    /// A [`Criterion::Predicate`] is returned unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nestkit_enumerable::{Operator, Predicate};
    /// use nestkit_value::{Key, Value};
    ///
    /// let adult = Predicate::from_operator("age", Some(Operator::GreaterOrEqual), Some(Value::from(18)));
    /// let user: Value = vec![("age", 21)].into_iter().collect();
    /// assert!(adult.test(&user, &Key::Index(0)));
    /// ```
    pub fn from_operator(
        criterion: impl Into<Criterion>,
        operator: Option<Operator>,
        value: Option<Value>,
    ) -> Predicate {
        let path = match criterion.into() {
            Criterion::Predicate(predicate) => return predicate,
            Criterion::Path(path) => path,
        };
        let (operator, value) = match (operator, value) {
            (None, None) => (Operator::Equal, Value::Bool(true)),
            (None, Some(value)) => (Operator::Equal, value),
            (Some(operator), value) => (operator, value.unwrap_or_default()),
        };
        Predicate::new(move |item, _| {
            let retrieved = data_get(item, path.as_ref(), Value::Null);
            operator.apply(&retrieved, &value)
        })
    }

    /// `path === true`.
    pub fn where_true(criterion: impl Into<Criterion>) -> Predicate {
        Predicate::from_operator(criterion, None, None)
    }

    /// `path === value`.
    pub fn equals(criterion: impl Into<Criterion>, value: impl Into<Value>) -> Predicate {
        Predicate::from_operator(criterion, None, Some(value.into()))
    }

    /// `path <operator> value`.
    pub fn compare(
        criterion: impl Into<Criterion>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Predicate {
        Predicate::from_operator(criterion, Some(operator.into()), Some(value.into()))
    }

    /// Truthiness of the value retrieved at `path`.
    pub fn truthy(criterion: impl Into<Criterion>) -> Predicate {
        match criterion.into() {
            Criterion::Predicate(predicate) => predicate,
            Criterion::Path(path) => {
                Predicate::new(move |item, _| data_get(item, path.as_ref(), Value::Null).is_truthy())
            }
        }
    }

    /// The item itself `=== value`.
    pub fn equality(value: impl Into<Value>) -> Predicate {
        let value = value.into();
        Predicate::new(move |item, _| *item == value)
    }

    #[must_use]
    pub fn negate(self) -> Predicate {
        Predicate::new(move |item, key| !self.test(item, key))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl From<Predicate> for Criterion {
    fn from(predicate: Predicate) -> Self {
        Criterion::Predicate(predicate)
    }
}

impl From<&str> for Criterion {
    fn from(path: &str) -> Self {
        Criterion::Path(path.into_path())
    }
}

impl From<String> for Criterion {
    fn from(path: String) -> Self {
        Criterion::Path(path.into_path())
    }
}

impl From<Path> for Criterion {
    fn from(path: Path) -> Self {
        Criterion::Path(Some(path))
    }
}

impl From<Option<&str>> for Criterion {
    fn from(path: Option<&str>) -> Self {
        Criterion::Path(path.into_path())
    }
}

/// How an operation derives a comparable from each item.
pub enum Retriever<'a> {
    /// The item itself.
    Identity,
    /// `data_get(item, path)`.
    Path(Path),
    /// A caller-supplied function of the item and its key.
    Callback(Box<dyn FnMut(&Value, &Key) -> Value + 'a>),
}

impl<'a> Retriever<'a> {
    pub fn identity() -> Self {
        Retriever::Identity
    }

    /// Retrieve by path; the null path is the identity.
    pub fn path(path: impl IntoPath) -> Self {
        match path.into_path() {
            Some(path) => Retriever::Path(path),
            None => Retriever::Identity,
        }
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&Value, &Key) -> Value + 'a,
    {
        Retriever::Callback(Box::new(f))
    }

    pub fn retrieve(&mut self, value: &Value, key: &Key) -> Value {
        match self {
            Retriever::Identity => value.clone(),
            Retriever::Path(path) => data_get(value, &*path, Value::Null),
            Retriever::Callback(f) => f(value, key),
        }
    }
}

impl From<&str> for Retriever<'_> {
    fn from(path: &str) -> Self {
        Retriever::path(path)
    }
}

impl From<String> for Retriever<'_> {
    fn from(path: String) -> Self {
        Retriever::path(path)
    }
}

impl From<Path> for Retriever<'_> {
    fn from(path: Path) -> Self {
        Retriever::Path(path)
    }
}

impl From<Option<&str>> for Retriever<'_> {
    fn from(path: Option<&str>) -> Self {
        Retriever::path(path)
    }
}

impl fmt::Debug for Retriever<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Retriever::Identity => f.write_str("Identity"),
            Retriever::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Retriever::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestkit_value::{Collection, Record};
    use serde_json::json;

    fn item(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn key() -> Key {
        Key::Index(0)
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(Operator::parse("="), Operator::Equal);
        assert_eq!(Operator::parse("=="), Operator::Equal);
        assert_eq!(Operator::parse("==="), Operator::Equal);
        assert_eq!(Operator::parse("<>"), Operator::NotEqual);
        assert_eq!(Operator::parse("!=="), Operator::NotEqual);
        assert_eq!(Operator::parse(">="), Operator::GreaterOrEqual);
        assert_eq!(Operator::parse("like"), Operator::Equal);
    }

    #[test]
    fn single_argument_means_strictly_true() {
        let p = Predicate::where_true("active");
        assert!(p.test(&item(json!({"active": true})), &key()));
        assert!(!p.test(&item(json!({"active": 1})), &key()));
        assert!(!p.test(&item(json!({})), &key()));
    }

    #[test]
    fn two_arguments_mean_strict_equality() {
        let p = Predicate::equals("id", 1);
        assert!(p.test(&item(json!({"id": 1})), &key()));
        assert!(!p.test(&item(json!({"id": "1"})), &key()));
    }

    #[test]
    fn ordered_operators() {
        let p = Predicate::compare("n", ">", 5);
        assert!(p.test(&item(json!({"n": 6})), &key()));
        assert!(!p.test(&item(json!({"n": 5})), &key()));
        assert!(p.test(&item(json!({"n": "10"})), &key()));
        // Incomparable pairs never satisfy an ordered operator.
        assert!(!p.test(&item(json!({"n": "abc"})), &key()));
        assert!(!p.test(&item(json!({})), &key()));
    }

    #[test]
    fn objects_only_satisfy_inequality() {
        let user = Record::new("User").into_value();
        let holder: Value = vec![("owner", user)].into_iter().collect();

        assert!(!Predicate::equals("owner", "x").test(&holder, &key()));
        assert!(Predicate::compare("owner", "!=", 1).test(&holder, &key()));
        assert!(!Predicate::compare("owner", ">", 1).test(&holder, &key()));
        assert!(Predicate::compare("owner", "!==", Value::Null).test(&holder, &key()));
    }

    #[test]
    fn collection_against_string_is_strict() {
        let holder: Value = vec![("tags", Value::Collection(Collection::new()))]
            .into_iter()
            .collect();
        // Both sides are stringable, so the comparison runs strictly.
        assert!(!Predicate::equals("tags", "[]").test(&holder, &key()));
    }

    #[test]
    fn predicate_passes_through() {
        let p = Predicate::new(|v, _| v.as_i64() == Some(3));
        let q = Predicate::from_operator(p, Some(Operator::LessThan), Some(Value::from(0)));
        assert!(q.test(&Value::from(3), &key()));
    }

    #[test]
    fn null_path_compares_item_itself() {
        let p = Predicate::equals(None::<&str>, 7);
        assert!(p.test(&Value::from(7), &key()));
    }

    #[test]
    fn truthy_and_negate() {
        let p = Predicate::truthy("name");
        assert!(p.test(&item(json!({"name": "x"})), &key()));
        assert!(!p.test(&item(json!({"name": ""})), &key()));
        let q = p.negate();
        assert!(q.test(&item(json!({"name": ""})), &key()));
    }

    #[test]
    fn equality_is_strict() {
        let p = Predicate::equality(1);
        assert!(p.test(&Value::from(1), &key()));
        assert!(!p.test(&Value::from(1.0), &key()));
    }

    #[test]
    fn retrievers() {
        let value = item(json!({"a": {"b": 2}}));
        assert_eq!(Retriever::identity().retrieve(&value, &key()), value);
        assert_eq!(Retriever::from("a.b").retrieve(&value, &key()), Value::from(2));
        assert_eq!(Retriever::path(None::<&str>).retrieve(&value, &key()), value);

        let mut calls = 0;
        let mut counting = Retriever::callback(|_, k| {
            calls += 1;
            k.to_value()
        });
        assert_eq!(counting.retrieve(&value, &Key::from("k")), Value::from("k"));
        drop(counting);
        assert_eq!(calls, 1);
    }
}
