//! Equality and ordering between values.
//!
//! `==` on [`Value`] is strict: same variant, same contents, maps compared
//! entry by entry in order, objects by identity. [`Value::loose_eq`] and
//! [`Value::compare`] implement the looser comparisons predicates rely on.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::{Key, Number, Value};

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => ordered_map_eq(a, b),
            (Value::Collection(a), Value::Collection(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// Entry-by-entry comparison; `IndexMap`'s own `==` ignores order.
pub(crate) fn ordered_map_eq(a: &IndexMap<Key, Value>, b: &IndexMap<Key, Value>) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

impl Value {
    /// Loose equality.
    ///
    /// - booleans compare by truthiness against anything
    /// - null equals every falsy scalar and empty container
    /// - numbers and numeric strings compare numerically
    /// - other strings compare byte-wise
    /// - arrays and maps compare element-wise, loosely
    /// - objects compare by identity
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), b) | (b, Value::Bool(a)) => *a == b.is_truthy(),
            (Value::Null, Value::Null) => true,
            (Value::Null, v) | (v, Value::Null) => match v {
                Value::Object(_) | Value::Collection(_) => false,
                _ => !v.is_truthy() && !matches!(v, Value::String(s) if s == "0"),
            },
            (Value::String(a), Value::String(b)) => {
                match (Number::parse(a), Number::parse(b)) {
                    (Some(x), Some(y)) => x.compare(&y) == Some(Ordering::Equal),
                    _ => a == b,
                }
            }
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.loose_eq(w)))
            }
            (Value::Collection(a), Value::Collection(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (a, b) => match (a.numeric(), b.numeric()) {
                (Some(x), Some(y)) => x.compare(&y) == Some(Ordering::Equal),
                _ => false,
            },
        }
    }

    /// Native ordering between two values, when one exists.
    ///
    /// Numbers and numeric strings order numerically, other strings
    /// lexically, booleans `false < true`, arrays by length and then
    /// element-wise. Any other pairing is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => {
                match (Number::parse(a), Number::parse(b)) {
                    (Some(x), Some(y)) => x.compare(&y),
                    _ => Some(a.cmp(b)),
                }
            }
            (Value::Array(a), Value::Array(b)) => {
                if a.len() != b.len() {
                    return Some(a.len().cmp(&b.len()));
                }
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(Ordering::Equal)
            }
            (a, b) => a.numeric()?.compare(&b.numeric()?),
        }
    }

    /// Numbers, and strings that spell a number.
    fn numeric(&self) -> Option<Number> {
        match self {
            Value::Integer(i) => Some(Number::Integer(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::String(s) => Number::parse(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Collection, Record};

    #[test]
    fn strict_equality_distinguishes_types() {
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_ne!(Value::Null, Value::from(false));
        assert_eq!(Value::from("a"), Value::from("a"));
    }

    #[test]
    fn strict_map_equality_is_ordered() {
        let ab: Value = vec![("a", 1), ("b", 2)].into_iter().collect();
        let ba: Value = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Record::new("User").into_value();
        let b = Record::new("User").into_value();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn loose_equality() {
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from("1").loose_eq(&Value::from("01")));
        assert!(Value::from(1.0).loose_eq(&Value::from(1)));
        assert!(Value::Null.loose_eq(&Value::from(false)));
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(Value::Null.loose_eq(&Value::from(0)));
        assert!(!Value::Null.loose_eq(&Value::from("0")));
        assert!(Value::from(true).loose_eq(&Value::from("yes")));
        assert!(!Value::from("abc").loose_eq(&Value::from(0)));
        assert!(!Value::from("abc").loose_eq(&Value::from("ABC")));
        assert!(!Value::Null.loose_eq(&Value::Collection(Collection::new())));
    }

    #[test]
    fn ordering_numbers_and_numeric_strings() {
        assert_eq!(
            Value::from(2).compare(&Value::from(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("10").compare(&Value::from("9")),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::from(2.5).compare(&Value::from("2.5")),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn ordering_strings_lexically() {
        assert_eq!(
            Value::from("apple").compare(&Value::from("banana")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn ordering_arrays_by_length_first() {
        let short = Value::from(vec![9]);
        let long = Value::from(vec![1, 1]);
        assert_eq!(short.compare(&long), Some(Ordering::Less));
        assert_eq!(
            Value::from(vec![1, 2]).compare(&Value::from(vec![1, 3])),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn incomparable_pairs() {
        assert_eq!(Value::from("abc").compare(&Value::from(1)), None);
        assert_eq!(Value::Null.compare(&Value::from(1)), None);
        assert_eq!(Value::map().compare(&Value::map()), None);
    }
}
