//! Keys of ordered maps and collections.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Value};

lazy_static! {
    static ref CANONICAL_INTEGER: Regex = Regex::new(r"^(0|-?[1-9][0-9]*)$").unwrap();
}

/// A map key: either a sequential integer position or a name.
///
/// Strings that spell a canonical decimal integer (`"0"`, `"42"`, `"-3"`)
/// are normalised to [`Key::Index`], so `"1"` and `1` address the same
/// entry. Strings such as `"007"`, `"+1"` or `"1.5"` stay names.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Parse a key from text, normalising canonical integers.
    pub fn parse(s: &str) -> Key {
        if CANONICAL_INTEGER.is_match(s) {
            if let Ok(index) = s.parse::<i64>() {
                return Key::Index(index);
            }
        }
        Key::Name(s.to_string())
    }

    /// Derive a key from a retrieved value, the way grouping and keying do.
    ///
    /// Booleans become `0`/`1`, null becomes the empty name, floats are
    /// truncated. Strings are normalised with [`Key::parse`]. Containers
    /// cannot be used as keys; objects only when they are stringable.
    pub fn from_value(value: &Value) -> Result<Key, Error> {
        match value {
            Value::Null => Ok(Key::Name(String::new())),
            Value::Bool(b) => Ok(Key::Index(i64::from(*b))),
            Value::Integer(i) => Ok(Key::Index(*i)),
            Value::Float(f) => Ok(Key::Index(f.trunc() as i64)),
            Value::String(s) => Ok(Key::parse(s)),
            Value::Object(object) => object
                .to_display()
                .map(|s| Key::parse(&s))
                .ok_or_else(|| {
                    Error::type_mismatch(format!(
                        "object of class {} cannot be used as a key",
                        object.class_name()
                    ))
                }),
            other => Err(Error::type_mismatch(format!(
                "{} cannot be used as a key",
                other.type_name()
            ))),
        }
    }

    /// The integer position, if this is an index key.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    /// The key as a value (`Integer` or `String`).
    pub fn to_value(&self) -> Value {
        match self {
            Key::Index(i) => Value::Integer(*i),
            Key::Name(name) => Value::String(name.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i64::from(i))
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::parse(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::parse(&s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::parse(s)
    }
}
